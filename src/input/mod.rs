pub(crate) mod editing;
pub(crate) mod navigate;
pub(crate) mod popups;

use crate::{app::App, models::InputMode};
use crossterm::event::{Event, KeyEventKind};

pub fn handle_event(app: &mut App, event: Event) {
    if let Event::Key(key) = event
        && key.kind == KeyEventKind::Press
    {
        if popups::handle_popup_events(app, key) {
            return;
        }
        match app.input_mode {
            InputMode::Navigate => navigate::handle_normal_mode(app, key),
            InputMode::Editing => editing::handle_editing_mode(app, key),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::app::App;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use crate::store::EventStore;
    use chrono::NaiveDate;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

    pub fn make_test_app() -> App<'static> {
        let store = EventStore::open(Box::new(MemoryStore::new())).expect("open store");
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        App::with_store(Config::default(), store, today)
    }

    pub fn press(app: &mut App, code: KeyCode) {
        press_with(app, code, KeyModifiers::NONE);
    }

    pub fn press_with(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
        super::handle_event(app, Event::Key(KeyEvent::new(code, modifiers)));
    }

    pub fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }
}
