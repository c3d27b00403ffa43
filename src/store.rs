use crate::error::{StoreError, StoreResult};
use crate::models::{Event, EventId};
use crate::storage::KeyValueStore;

/// Key holding the serialized event list.
pub const STORAGE_KEY: &str = "calendar-events";

#[derive(Clone, Debug)]
struct Slot {
    id: EventId,
    event: Event,
}

/// Ordered event collection mirrored into a key-value store.
///
/// Positions are indices into the current order and shift after a delete. Every
/// event also gets an [`EventId`] that survives reordering for the lifetime of
/// the process. Each successful mutation rewrites the whole snapshot; if that
/// write fails the in-memory change is kept and the error returned.
pub struct EventStore {
    slots: Vec<Slot>,
    next_id: u64,
    backend: Box<dyn KeyValueStore>,
}

pub fn serialize_events<'a>(events: impl IntoIterator<Item = &'a Event>) -> StoreResult<String> {
    let events: Vec<&Event> = events.into_iter().collect();
    Ok(serde_json::to_string(&events)?)
}

pub fn deserialize_events(raw: &str) -> Result<Vec<Event>, serde_json::Error> {
    serde_json::from_str(raw)
}

impl EventStore {
    /// Loads the stored list, or starts empty when the key is absent or blank.
    pub fn open(backend: Box<dyn KeyValueStore>) -> StoreResult<Self> {
        let events = match backend.get(STORAGE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => {
                deserialize_events(&raw).map_err(|source| StoreError::Corrupt {
                    key: STORAGE_KEY.to_string(),
                    source,
                })?
            }
            _ => Vec::new(),
        };

        let mut store = Self {
            slots: Vec::with_capacity(events.len()),
            next_id: 0,
            backend,
        };
        for event in events {
            let id = store.allocate_id();
            store.slots.push(Slot { id, event });
        }
        tracing::info!(
            events = store.slots.len(),
            location = %store.backend.describe(),
            "event store opened"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Event> {
        self.slots.get(position).map(|slot| &slot.event)
    }

    pub fn id_at(&self, position: usize) -> Option<EventId> {
        self.slots.get(position).map(|slot| slot.id)
    }

    pub fn position_of(&self, id: EventId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.slots.iter().map(|slot| &slot.event)
    }

    pub fn location(&self) -> String {
        self.backend.describe()
    }

    /// Appends `event` and returns its position.
    pub fn add(&mut self, event: Event) -> StoreResult<usize> {
        if !event.has_all_fields() {
            return Err(StoreError::MissingFields);
        }
        let id = self.allocate_id();
        tracing::debug!(id = id.0, date = %event.date, "add event");
        self.slots.push(Slot { id, event });
        self.persist()?;
        Ok(self.slots.len() - 1)
    }

    /// Replaces the event at `position`. Its id is unchanged.
    pub fn update(&mut self, position: usize, event: Event) -> StoreResult<()> {
        if !event.has_all_fields() {
            return Err(StoreError::MissingFields);
        }
        let slot = self
            .slots
            .get_mut(position)
            .ok_or(StoreError::NoSuchPosition(position))?;
        tracing::debug!(id = slot.id.0, position, "update event");
        slot.event = event;
        self.persist()
    }

    /// Removes the event at `position`; later positions shift down by one.
    pub fn delete(&mut self, position: usize) -> StoreResult<Event> {
        if position >= self.slots.len() {
            return Err(StoreError::NoSuchPosition(position));
        }
        let slot = self.slots.remove(position);
        tracing::debug!(id = slot.id.0, position, "delete event");
        self.persist()?;
        Ok(slot.event)
    }

    /// Events whose date equals `date` exactly, with their current positions, in
    /// collection order.
    pub fn find_by_date(&self, date: &str) -> Vec<(usize, &Event)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.event.date == date)
            .map(|(position, slot)| (position, &slot.event))
            .collect()
    }

    fn allocate_id(&mut self) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        id
    }

    fn persist(&mut self) -> StoreResult<()> {
        let raw = serialize_events(self.iter())?;
        if let Err(e) = self.backend.set(STORAGE_KEY, &raw) {
            tracing::error!(error = %e, location = %self.backend.describe(), "failed to persist events");
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    /// Backend whose state stays visible to the test after the store takes ownership.
    #[derive(Clone, Default)]
    struct SharedStore {
        value: Rc<RefCell<Option<String>>>,
        writes: Rc<RefCell<usize>>,
        fail: bool,
    }

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            assert_eq!(key, STORAGE_KEY);
            Ok(self.value.borrow().clone())
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            assert_eq!(key, STORAGE_KEY);
            if self.fail {
                return Err(io::Error::other("disk full"));
            }
            *self.writes.borrow_mut() += 1;
            *self.value.borrow_mut() = Some(value.to_string());
            Ok(())
        }

        fn describe(&self) -> String {
            "shared".to_string()
        }
    }

    fn empty_store() -> EventStore {
        EventStore::open(Box::new(MemoryStore::new())).expect("open")
    }

    fn ev(title: &str, date: &str) -> Event {
        Event::new(title, date, "09:00", "30m")
    }

    #[test]
    fn standup_is_found_at_position_zero() {
        let mut store = empty_store();
        let standup = Event::new("Standup", "2024-03-01", "09:00", "30m");
        assert_eq!(store.add(standup.clone()).unwrap(), 0);

        let found = store.find_by_date("2024-03-01");
        assert_eq!(found, vec![(0, &standup)]);
    }

    #[test]
    fn add_rejects_missing_fields_without_writing() {
        let backend = SharedStore::default();
        let mut store = EventStore::open(Box::new(backend.clone())).unwrap();

        let mut event = ev("Standup", "2024-03-01");
        event.date.clear();
        assert!(matches!(store.add(event), Err(StoreError::MissingFields)));
        assert!(store.is_empty());
        assert_eq!(*backend.writes.borrow(), 0);
    }

    #[test]
    fn find_by_date_uses_exact_string_match_in_order() {
        let mut store = empty_store();
        store.add(ev("a", "2024-03-01")).unwrap();
        store.add(ev("b", "2024-03-02")).unwrap();
        store.add(ev("c", "2024-03-01")).unwrap();
        store.add(ev("d", "2024-3-1")).unwrap();
        store.add(ev("e", "2024-03-01 ")).unwrap();

        let titles: Vec<(usize, &str)> = store
            .find_by_date("2024-03-01")
            .into_iter()
            .map(|(p, e)| (p, e.title.as_str()))
            .collect();
        assert_eq!(titles, vec![(0, "a"), (2, "c")]);
        assert!(store.find_by_date("2024-04-01").is_empty());
    }

    #[test]
    fn update_replaces_only_the_target() {
        let mut store = empty_store();
        store.add(ev("a", "2024-03-01")).unwrap();
        store.add(ev("b", "2024-03-02")).unwrap();
        store.add(ev("c", "2024-03-03")).unwrap();
        let id_before = store.id_at(1);

        let replacement = Event::new("B2", "2024-03-09", "10:00", "1h");
        store.update(1, replacement.clone()).unwrap();

        assert_eq!(store.get(1), Some(&replacement));
        assert_eq!(store.get(0).unwrap().title, "a");
        assert_eq!(store.get(2).unwrap().title, "c");
        assert_eq!(store.id_at(1), id_before);
    }

    #[test]
    fn update_validates_and_checks_range() {
        let mut store = empty_store();
        store.add(ev("a", "2024-03-01")).unwrap();

        let mut blank = ev("a", "2024-03-01");
        blank.time.clear();
        assert!(matches!(store.update(0, blank), Err(StoreError::MissingFields)));
        assert!(matches!(
            store.update(5, ev("x", "2024-03-01")),
            Err(StoreError::NoSuchPosition(5))
        ));
        assert_eq!(store.get(0).unwrap().time, "09:00");
    }

    #[test]
    fn delete_shifts_later_positions_down() {
        let mut store = empty_store();
        for title in ["a", "b", "c", "d"] {
            store.add(ev(title, "2024-03-01")).unwrap();
        }
        let id_c = store.id_at(2).unwrap();

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.title, "b");
        assert_eq!(store.len(), 3);
        let titles: Vec<&str> = store.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);
        assert_eq!(store.position_of(id_c), Some(1));

        assert!(matches!(store.delete(3), Err(StoreError::NoSuchPosition(3))));
    }

    #[test]
    fn every_mutation_writes_a_full_snapshot() {
        let backend = SharedStore::default();
        let mut store = EventStore::open(Box::new(backend.clone())).unwrap();

        store.add(ev("a", "2024-03-01")).unwrap();
        store.add(ev("b", "2024-03-02")).unwrap();
        store.update(0, ev("a2", "2024-03-01")).unwrap();
        store.delete(1).unwrap();

        assert_eq!(*backend.writes.borrow(), 4);
        let raw = backend.value.borrow().clone().unwrap();
        assert_eq!(
            raw,
            r#"[{"title":"a2","date":"2024-03-01","time":"09:00","duration":"30m"}]"#
        );
    }

    #[test]
    fn reopen_restores_the_collection() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let events = vec![
            Event::new("Standup", "2024-03-01", "09:00", "30m"),
            Event::new("Lunch \"with\" Ana", "2024-03-01", "12:30", "1h"),
            Event::new("Ünïcode", "2024-03-02", "any time", "all day"),
        ];
        {
            let mut store = EventStore::open(Box::new(FileStore::new(dir.path()))).unwrap();
            for event in &events {
                store.add(event.clone()).unwrap();
            }
        }

        let store = EventStore::open(Box::new(FileStore::new(dir.path()))).unwrap();
        let restored: Vec<Event> = store.iter().cloned().collect();
        assert_eq!(restored, events);
    }

    #[test]
    fn serialized_snapshot_round_trips() {
        let events = vec![ev("a", "2024-03-01"), ev("b", "")];
        let raw = serialize_events(&events).unwrap();
        assert_eq!(deserialize_events(&raw).unwrap(), events);
        assert_eq!(serialize_events(&Vec::new()).unwrap(), "[]");
    }

    #[test]
    fn blank_stored_value_starts_empty() {
        let store = EventStore::open(Box::new(MemoryStore::with_entry(STORAGE_KEY, ""))).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_stored_value_is_reported() {
        let backend = MemoryStore::with_entry(STORAGE_KEY, "{not json");
        match EventStore::open(Box::new(backend)) {
            Err(StoreError::Corrupt { key, .. }) => assert_eq!(key, STORAGE_KEY),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("corrupt value accepted"),
        }
    }

    #[test]
    fn failed_write_keeps_the_in_memory_change() {
        let backend = SharedStore {
            fail: true,
            ..SharedStore::default()
        };
        let mut store = EventStore::open(Box::new(backend)).unwrap();

        assert!(matches!(
            store.add(ev("a", "2024-03-01")),
            Err(StoreError::Io(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn ids_are_unique_and_never_reused() {
        let mut store = empty_store();
        store.add(ev("a", "2024-03-01")).unwrap();
        let first = store.id_at(0).unwrap();
        store.delete(0).unwrap();
        store.add(ev("b", "2024-03-01")).unwrap();
        assert_ne!(store.id_at(0).unwrap(), first);
        assert_eq!(store.position_of(first), None);
    }
}
