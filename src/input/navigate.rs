use crate::{
    app::App,
    config::key_match,
    grid::DAYS_PER_WEEK,
    models::NavigateFocus,
};
use crossterm::event::KeyEvent;

pub fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    if app.navigate_focus == NavigateFocus::DayEvents && handle_day_events(app, key) {
        return;
    }

    let bindings = &app.config.keybindings;
    if key_match(&key, &bindings.global.quit) {
        app.quit();
    } else if key_match(&key, &bindings.global.help) {
        app.show_help_popup = true;
    } else if key_match(&key, &bindings.global.add_event) {
        app.open_form();
    } else if key_match(&key, &bindings.global.today) {
        app.jump_to_today();
    } else if key_match(&key, &bindings.global.prev_month) {
        app.prev_month();
    } else if key_match(&key, &bindings.global.next_month) {
        app.next_month();
    } else if app.navigate_focus == NavigateFocus::Grid {
        handle_grid(app, key);
    }
}

fn handle_grid(app: &mut App, key: KeyEvent) {
    let bindings = &app.config.keybindings.grid;
    if key_match(&key, &bindings.left) {
        app.move_selection(-1);
    } else if key_match(&key, &bindings.right) {
        app.move_selection(1);
    } else if key_match(&key, &bindings.up) {
        app.move_selection(-(DAYS_PER_WEEK as i64));
    } else if key_match(&key, &bindings.down) {
        app.move_selection(DAYS_PER_WEEK as i64);
    } else if key_match(&key, &bindings.open_day) {
        app.focus_day_events();
    }
}

/// Keys for the selected day's event list. Returns false to fall through to
/// the global bindings.
fn handle_day_events(app: &mut App, key: KeyEvent) -> bool {
    let bindings = &app.config.keybindings.day;
    if key_match(&key, &bindings.back) {
        app.focus_grid();
    } else if key_match(&key, &bindings.up) {
        app.day_events_up();
    } else if key_match(&key, &bindings.down) {
        app.day_events_down();
    } else if key_match(&key, &bindings.edit) {
        match app.selected_event_position() {
            Some(position) => app.begin_edit(position),
            None => app.toast("No event selected."),
        }
    } else if key_match(&key, &bindings.delete) {
        match app.selected_event_position() {
            Some(position) => app.request_delete(position),
            None => app.toast("No event selected."),
        }
    } else {
        return false;
    }
    true
}
