use crate::{app::App, config::key_match, models::InputMode};
use crossterm::event::KeyEvent;

pub fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    let bindings = &app.config.keybindings.form;

    if key_match(&key, &bindings.submit) {
        app.submit_draft();
    } else if key_match(&key, &bindings.cancel) {
        // Leaves the form; the draft and any edit target stay for later.
        app.transition_to(InputMode::Navigate);
    } else if key_match(&key, &bindings.clear) {
        app.clear_form();
    } else if key_match(&key, &bindings.next_field) {
        app.form.focus_next();
    } else if key_match(&key, &bindings.prev_field) {
        app.form.focus_prev();
    } else {
        app.form.input(key);
    }
}

#[cfg(test)]
mod tests {
    use crate::app::MISSING_FIELDS_ALERT;
    use crate::input::test_support::{make_test_app, press, press_with, type_text};
    use crate::models::{FormField, InputMode};
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn typing_a_full_event_and_submitting_adds_it() {
        let mut app = make_test_app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::Editing);

        type_text(&mut app, "Standup");
        press(&mut app, KeyCode::Tab);
        // Replace the prefilled date.
        for _ in 0..10 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "2024-03-01");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "09:00");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "30m");
        press(&mut app, KeyCode::Enter);

        let found = app.store.find_by_date("2024-03-01");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, 0);
        assert_eq!(found[0].1.title, "Standup");
        assert_eq!(found[0].1.time, "09:00");
        assert_eq!(app.input_mode, InputMode::Navigate);
    }

    #[test]
    fn missing_field_raises_alert_and_keeps_typing_state() {
        let mut app = make_test_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Standup");
        press(&mut app, KeyCode::Enter);

        assert!(app.store.is_empty());
        assert_eq!(app.alert_message.as_deref(), Some(MISSING_FIELDS_ALERT));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.form.value(FormField::Title), "Standup");
    }

    #[test]
    fn escape_leaves_form_without_losing_the_draft() {
        let mut app = make_test_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Navigate);
        assert!(!app.should_quit);
        assert_eq!(app.form.value(FormField::Title), "q");
    }

    #[test]
    fn ctrl_l_clears_draft_and_edit_target() {
        let mut app = make_test_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "x");
        press_with(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(app.form.is_blank());
        assert_eq!(app.edit_target, None);
    }

    #[test]
    fn shift_tab_moves_backwards() {
        let mut app = make_test_app();
        press(&mut app, KeyCode::Char('a'));
        press_with(&mut app, KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(app.form.active, FormField::Duration);
    }
}
