use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Navigate,
    Editing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateFocus {
    Grid,
    DayEvents,
}

/// Runtime handle for an event. Assigned from a counter when the event enters the
/// store and never written to disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(pub u64);

/// A committed calendar event. The serialized form is exactly the four text fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub date: String,
    pub time: String,
    pub duration: String,
}

impl Event {
    pub fn new(
        title: impl Into<String>,
        date: impl Into<String>,
        time: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            time: time.into(),
            duration: duration.into(),
        }
    }

    pub fn has_all_fields(&self) -> bool {
        !self.title.is_empty()
            && !self.date.is_empty()
            && !self.time.is_empty()
            && !self.duration.is_empty()
    }

    /// "09:00 - Standup (30m)"
    pub fn summary(&self) -> String {
        format!("{} - {} ({})", self.time, self.title, self.duration)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Time,
    Duration,
}

impl FormField {
    pub fn all() -> [FormField; 4] {
        [
            FormField::Title,
            FormField::Date,
            FormField::Time,
            FormField::Duration,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Date => "Date",
            FormField::Time => "Time",
            FormField::Duration => "Duration",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Date => "YYYY-MM-DD, today, +3d, next fri…",
            FormField::Time => "HH:MM",
            FormField::Duration => "Duration",
        }
    }

    pub fn next(self) -> FormField {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Duration,
            FormField::Duration => FormField::Title,
        }
    }

    pub fn prev(self) -> FormField {
        match self {
            FormField::Title => FormField::Duration,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::Duration => FormField::Time,
        }
    }
}
