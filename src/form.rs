use crossterm::event::KeyEvent;
use ratatui::style::Style;
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::models::{Event, FormField};

/// Draft event: one single-line text area per field plus the focused field.
pub struct EventForm<'a> {
    title: TextArea<'a>,
    date: TextArea<'a>,
    time: TextArea<'a>,
    duration: TextArea<'a>,
    pub active: FormField,
}

fn field_area<'a>(field: FormField, value: &str) -> TextArea<'a> {
    let mut area = TextArea::new(vec![value.to_string()]);
    area.set_placeholder_text(field.placeholder());
    area.set_cursor_line_style(Style::default());
    area.move_cursor(CursorMove::End);
    area
}

/// Fields are single-line; anything the text area would turn into a newline is dropped.
fn breaks_line(input: &Input) -> bool {
    match input.key {
        Key::Enter => true,
        Key::Char('\n' | '\r') => true,
        Key::Char('m') => input.ctrl,
        _ => false,
    }
}

impl<'a> Default for EventForm<'a> {
    fn default() -> Self {
        Self {
            title: field_area(FormField::Title, ""),
            date: field_area(FormField::Date, ""),
            time: field_area(FormField::Time, ""),
            duration: field_area(FormField::Duration, ""),
            active: FormField::Title,
        }
    }
}

impl<'a> EventForm<'a> {
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: field_area(FormField::Title, &event.title),
            date: field_area(FormField::Date, &event.date),
            time: field_area(FormField::Time, &event.time),
            duration: field_area(FormField::Duration, &event.duration),
            active: FormField::Title,
        }
    }

    pub fn area(&self, field: FormField) -> &TextArea<'a> {
        match field {
            FormField::Title => &self.title,
            FormField::Date => &self.date,
            FormField::Time => &self.time,
            FormField::Duration => &self.duration,
        }
    }

    pub fn area_mut(&mut self, field: FormField) -> &mut TextArea<'a> {
        match field {
            FormField::Title => &mut self.title,
            FormField::Date => &mut self.date,
            FormField::Time => &mut self.time,
            FormField::Duration => &mut self.duration,
        }
    }

    pub fn value(&self, field: FormField) -> String {
        self.area(field).lines().join("")
    }

    pub fn set_value(&mut self, field: FormField, value: &str) {
        *self.area_mut(field) = field_area(field, value);
    }

    pub fn to_event(&self) -> Event {
        Event {
            title: self.value(FormField::Title),
            date: self.value(FormField::Date),
            time: self.value(FormField::Time),
            duration: self.value(FormField::Duration),
        }
    }

    pub fn is_blank(&self) -> bool {
        FormField::all()
            .iter()
            .all(|field| self.value(*field).is_empty())
    }

    pub fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub fn focus_prev(&mut self) {
        self.active = self.active.prev();
    }

    /// Feeds a key to the focused field. Returns true if the text changed.
    pub fn input(&mut self, key: KeyEvent) -> bool {
        let input = Input::from(key);
        if breaks_line(&input) {
            return false;
        }
        let field = self.active;
        self.area_mut(field).input(input)
    }
}
