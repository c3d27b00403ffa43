use crate::{app::App, config::key_match};
use crossterm::event::{KeyCode, KeyEvent};

/// Routes keys to whichever popup is open. Returns true when a popup consumed the key.
pub fn handle_popup_events(app: &mut App, key: KeyEvent) -> bool {
    if app.alert_message.is_some() {
        handle_alert_popup(app, key);
        return true;
    }
    if app.delete_target.is_some() {
        handle_delete_event_popup(app, key);
        return true;
    }
    if app.show_help_popup {
        if key.code == KeyCode::Esc || key_match(&key, &app.config.keybindings.global.help) {
            app.show_help_popup = false;
        }
        return true;
    }
    false
}

// Blocking: only an explicit dismiss closes it.
fn handle_alert_popup(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.popup.confirm)
        || key_match(&key, &app.config.keybindings.popup.cancel)
        || key.code == KeyCode::Esc
    {
        app.alert_message = None;
    }
}

fn handle_delete_event_popup(app: &mut App, key: KeyEvent) {
    if key_match(&key, &app.config.keybindings.popup.confirm) {
        app.confirm_delete();
    } else if key_match(&key, &app.config.keybindings.popup.cancel) || key.code == KeyCode::Esc {
        app.delete_target = None;
    }
}
