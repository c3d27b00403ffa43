use crate::config::Config;
use crate::date_input::{add_months, normalize_date_field};
use crate::error::{StoreError, StoreResult};
use crate::form::EventForm;
use crate::grid::{MonthGrid, first_of_month, month_grid};
use crate::models::{Event, EventId, FormField, InputMode, NavigateFocus};
use crate::storage::FileStore;
use crate::store::EventStore;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use ratatui::widgets::ListState;

pub const MISSING_FIELDS_ALERT: &str = "All fields required!";

/// What happened to a submitted draft.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Added(usize),
    Updated(usize),
    Rejected,
}

pub struct App<'a> {
    pub input_mode: InputMode,
    pub navigate_focus: NavigateFocus,
    pub store: EventStore,
    pub today: NaiveDate,
    /// Reference date of the displayed month.
    pub view_month: NaiveDate,
    pub selected_day: NaiveDate,
    pub day_events_state: ListState,

    pub form: EventForm<'a>,
    pub edit_target: Option<EventId>,

    pub show_help_popup: bool,
    pub alert_message: Option<String>,
    pub delete_target: Option<EventId>,
    pub toast_message: Option<String>,
    pub toast_expiry: Option<DateTime<Local>>,
    pub should_quit: bool,

    pub config: Config,
}

impl<'a> App<'a> {
    /// Opens the file-backed store named by `config`.
    pub fn new(config: Config) -> StoreResult<App<'a>> {
        let backend = FileStore::new(&config.data.storage_dir);
        let store = EventStore::open(Box::new(backend))?;
        Ok(Self::with_store(config, store, Local::now().date_naive()))
    }

    pub fn with_store(config: Config, store: EventStore, today: NaiveDate) -> App<'a> {
        App {
            input_mode: InputMode::Navigate,
            navigate_focus: NavigateFocus::Grid,
            store,
            today,
            view_month: first_of_month(today),
            selected_day: today,
            day_events_state: ListState::default(),
            form: EventForm::default(),
            edit_target: None,
            show_help_popup: false,
            alert_message: None,
            delete_target: None,
            toast_message: None,
            toast_expiry: None,
            should_quit: false,
            config,
        }
    }

    pub fn grid(&self) -> MonthGrid {
        month_grid(self.view_month, self.today, self.config.calendar.week_start)
    }

    pub fn is_editing_event(&self) -> bool {
        self.edit_target.is_some()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_editing_event() {
            "Update Event"
        } else {
            "Add Event"
        }
    }

    pub fn selected_iso(&self) -> String {
        self.selected_day.format("%Y-%m-%d").to_string()
    }

    /// Events on the selected day with their store positions.
    pub fn selected_day_events(&self) -> Vec<(usize, &Event)> {
        self.store.find_by_date(&self.selected_iso())
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_expiry = Some(Local::now() + Duration::seconds(2));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn transition_to(&mut self, mode: InputMode) {
        if mode == InputMode::Navigate && self.navigate_focus == NavigateFocus::DayEvents {
            self.clamp_day_selection();
        }
        self.input_mode = mode;
    }

    // Month navigation

    pub fn next_month(&mut self) {
        self.shift_month(1);
    }

    pub fn prev_month(&mut self) {
        self.shift_month(-1);
    }

    fn shift_month(&mut self, months: i32) {
        self.view_month = first_of_month(add_months(self.view_month, months));
        self.selected_day = add_months(self.selected_day, months);
        self.reset_day_selection();
    }

    pub fn jump_to_today(&mut self) {
        self.select_day(self.today);
    }

    /// Selects `date`, following it into another month when needed.
    pub fn select_day(&mut self, date: NaiveDate) {
        self.selected_day = date;
        if date.year() != self.view_month.year() || date.month() != self.view_month.month() {
            self.view_month = first_of_month(date);
        }
        self.reset_day_selection();
    }

    pub fn move_selection(&mut self, days: i64) {
        self.select_day(self.selected_day + Duration::days(days));
    }

    // Day event list

    pub fn focus_day_events(&mut self) {
        if self.selected_day_events().is_empty() {
            self.toast("No events on this day.");
            return;
        }
        self.navigate_focus = NavigateFocus::DayEvents;
        self.clamp_day_selection();
    }

    pub fn focus_grid(&mut self) {
        self.navigate_focus = NavigateFocus::Grid;
    }

    pub fn day_events_up(&mut self) {
        if let Some(i) = self.day_events_state.selected() {
            self.day_events_state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn day_events_down(&mut self) {
        let len = self.selected_day_events().len();
        if len == 0 {
            return;
        }
        let next = self
            .day_events_state
            .selected()
            .map(|i| (i + 1).min(len - 1))
            .unwrap_or(0);
        self.day_events_state.select(Some(next));
    }

    /// Store position of the highlighted event in the day list.
    pub fn selected_event_position(&self) -> Option<usize> {
        let i = self.day_events_state.selected()?;
        self.selected_day_events().get(i).map(|(position, _)| *position)
    }

    fn reset_day_selection(&mut self) {
        self.day_events_state = ListState::default();
        self.navigate_focus = NavigateFocus::Grid;
    }

    fn clamp_day_selection(&mut self) {
        let len = self.selected_day_events().len();
        if len == 0 {
            self.day_events_state.select(None);
            self.navigate_focus = NavigateFocus::Grid;
        } else {
            let i = self.day_events_state.selected().unwrap_or(0).min(len - 1);
            self.day_events_state.select(Some(i));
        }
    }

    // Draft form

    /// Focuses the form. An untouched draft gets the selected day as its date.
    pub fn open_form(&mut self) {
        if self.form.is_blank() && !self.is_editing_event() {
            let iso = self.selected_iso();
            self.form.set_value(FormField::Date, &iso);
        }
        self.transition_to(InputMode::Editing);
    }

    /// Starts editing the event at `position` with the draft pre-filled from it.
    pub fn begin_edit(&mut self, position: usize) {
        let (Some(id), Some(event)) = (self.store.id_at(position), self.store.get(position)) else {
            self.toast("No event selected.");
            return;
        };
        self.form = EventForm::from_event(event);
        self.edit_target = Some(id);
        self.transition_to(InputMode::Editing);
    }

    /// Drops the draft and any edit in progress.
    pub fn clear_form(&mut self) {
        self.form = EventForm::default();
        self.edit_target = None;
    }

    /// Commits the draft: update when an edit is in progress, add otherwise.
    /// On missing fields nothing changes, the alert is raised and the draft kept.
    pub fn submit_draft(&mut self) -> SubmitOutcome {
        let mut draft = self.form.to_event();
        draft.date = normalize_date_field(&draft.date, self.today);

        if !draft.has_all_fields() {
            self.alert_message = Some(MISSING_FIELDS_ALERT.to_string());
            return SubmitOutcome::Rejected;
        }

        let target = self.edit_target.and_then(|id| self.store.position_of(id));
        let date = NaiveDate::parse_from_str(&draft.date, "%Y-%m-%d").ok();
        let result = match target {
            Some(position) => self
                .store
                .update(position, draft)
                .map(|_| SubmitOutcome::Updated(position)),
            None => self.store.add(draft).map(SubmitOutcome::Added),
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(StoreError::MissingFields) => {
                self.alert_message = Some(MISSING_FIELDS_ALERT.to_string());
                return SubmitOutcome::Rejected;
            }
            Err(e) => {
                // The store kept the change in memory.
                self.toast(format!("Could not save events: {e}"));
                match target {
                    Some(position) => SubmitOutcome::Updated(position),
                    None => SubmitOutcome::Added(self.store.len() - 1),
                }
            }
        };

        self.clear_form();
        self.transition_to(InputMode::Navigate);
        if let Some(date) = date {
            self.select_day(date);
        }
        outcome
    }

    // Delete

    pub fn request_delete(&mut self, position: usize) {
        match self.store.id_at(position) {
            Some(id) => self.delete_target = Some(id),
            None => self.toast("No event selected."),
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(id) = self.delete_target.take() else {
            return;
        };
        if let Some(position) = self.store.position_of(id) {
            self.delete_event(position);
        }
    }

    /// Removes the event at `position`. Cancels the edit if it targeted that
    /// event; any other edit target still names the same event.
    pub fn delete_event(&mut self, position: usize) {
        let id = self.store.id_at(position);
        match self.store.delete(position) {
            Ok(_) => self.toast("Event deleted."),
            Err(StoreError::NoSuchPosition(_)) => {
                self.toast("No event selected.");
                return;
            }
            Err(e) => self.toast(format!("Could not save events: {e}")),
        }
        if id.is_some() && self.edit_target == id {
            self.clear_form();
        }
        self.clamp_day_selection();
    }

    /// Advances "today" when the wall clock crosses midnight.
    pub fn refresh_today(&mut self, now: NaiveDate) -> bool {
        if now == self.today {
            return false;
        }
        self.today = now;
        true
    }
}
