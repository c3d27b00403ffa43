use crate::app::App;
use chrono::{DateTime, Local};

pub fn tick(app: &mut App) {
    tick_at(app, Local::now());
}

pub(crate) fn tick_at(app: &mut App, now: DateTime<Local>) {
    if app.refresh_today(now.date_naive()) {
        tracing::info!(today = %app.today, "day rollover");
    }

    if let Some(expiry) = app.toast_expiry
        && now >= expiry
    {
        app.toast_expiry = None;
        app.toast_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;
    use crate::store::EventStore;
    use chrono::Duration;

    #[test]
    fn expires_toasts_and_follows_the_clock() {
        let store = EventStore::open(Box::new(MemoryStore::new())).unwrap();
        let yesterday = Local::now().date_naive() - Duration::days(1);
        let mut app = App::with_store(Config::default(), store, yesterday);
        app.toast("hello");

        tick_at(&mut app, Local::now());
        assert_eq!(app.today, Local::now().date_naive());
        assert!(app.toast_message.is_some());

        tick_at(&mut app, Local::now() + Duration::seconds(3));
        assert!(app.toast_message.is_none());
        assert!(app.toast_expiry.is_none());
    }
}
