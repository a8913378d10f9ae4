use std::sync::Arc;

use crate::activity_log::ActivityLog;
use crate::catalog::ReminderCatalog;
use crate::config::Config;
use crate::error::ValidationError;
use crate::events::EventBus;
use crate::notify::NotificationSink;
use crate::registry::ReminderRegistry;
use crate::reminder::{ReminderDefinition, ReminderKey};
use crate::scheduler::ReminderScheduler;

pub const STARTUP_MESSAGE: &str = "Study Helper started! Add reminders to begin.";

/// One process-wide set of reminder components, wired together.
///
/// The presentation layer holds this by reference; there is no global state.
#[derive(Debug)]
pub struct StudyHelper {
    bus: EventBus,
    scheduler: ReminderScheduler,
    catalog: ReminderCatalog,
}

impl StudyHelper {
    /// Wire up components from config, checking for an OS notifier.
    pub fn from_config(config: &Config) -> Self {
        let bus = EventBus::new();
        let sink = NotificationSink::detect(&config.notifications, bus.clone());
        Self::new(config.builtin_definitions(), sink, bus)
    }

    pub fn new(builtins: Vec<ReminderDefinition>, sink: NotificationSink, bus: EventBus) -> Self {
        let log = Arc::new(ActivityLog::new(bus.clone()));
        let scheduler = ReminderScheduler::new(
            Arc::new(ReminderRegistry::new()),
            log,
            Arc::new(sink),
            bus.clone(),
        );
        Self {
            bus,
            scheduler,
            catalog: ReminderCatalog::new(builtins),
        }
    }

    /// Append the greeting line. Subscribe to [`events`](Self::events) first
    /// to see it.
    pub fn announce(&self) {
        self.log().append(STARTUP_MESSAGE);
    }

    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn scheduler(&self) -> &ReminderScheduler {
        &self.scheduler
    }

    pub fn catalog(&self) -> &ReminderCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ReminderRegistry {
        self.scheduler.registry()
    }

    pub fn log(&self) -> &ActivityLog {
        self.scheduler.log()
    }

    /// Toggle the catalog row for `key`. Returns `None` for unknown keys.
    pub fn toggle(&self, key: &ReminderKey) -> Option<Result<bool, ValidationError>> {
        let def = self.catalog.find(key)?;
        Some(self.scheduler.toggle(key, def.interval_minutes, &def.message))
    }

    /// Start the catalog row for `key`. Returns `None` for unknown keys.
    pub fn start(&self, key: &ReminderKey) -> Option<Result<(), ValidationError>> {
        let def = self.catalog.find(key)?;
        Some(self.scheduler.start(key, def.interval_minutes, &def.message))
    }

    pub fn add_custom(
        &self,
        name: &str,
        message: &str,
        interval: &str,
    ) -> Result<ReminderDefinition, ValidationError> {
        self.catalog.add_custom_logged(name, message, interval, self.log())
    }

    pub fn remove_custom(&self, key: &ReminderKey) -> Option<ReminderDefinition> {
        self.catalog.remove_custom(key, &self.scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::PopupBoard;
    use crate::reminder::builtin_reminders;
    use std::time::Duration;

    fn helper() -> StudyHelper {
        let bus = EventBus::new();
        let sink = NotificationSink::fallback_only(
            "Study Reminder",
            PopupBoard::new(Duration::from_secs(10), bus.clone()),
        );
        StudyHelper::new(builtin_reminders(), sink, bus)
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_unknown_key_is_none() {
        let app = helper();
        assert!(app.toggle(&ReminderKey::from("nope")).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_uses_catalog_settings() {
        let app = helper();
        let key = ReminderKey::from("Hydrate_30");
        assert_eq!(app.toggle(&key), Some(Ok(true)));
        let active = app.registry().get(&key).unwrap();
        assert_eq!(active.interval_minutes, 30);
        assert_eq!(active.message, "Time to hydrate! Drink some water.");
    }

    #[tokio::test(start_paused = true)]
    async fn remove_custom_stops_running_reminder() {
        let app = helper();
        let def = app.add_custom("Posture", "Check your posture", "20").unwrap();
        let key = def.key();
        app.start(&key).unwrap().unwrap();
        assert!(app.registry().is_active(&key));

        let removed = app.remove_custom(&key).unwrap();
        assert_eq!(removed.name, "Posture");
        assert!(!app.registry().is_active(&key));
        assert!(app.catalog().customs().is_empty());
        assert!(app.log().lines().last().unwrap().contains("Removed custom reminder"));
    }

    #[tokio::test(start_paused = true)]
    async fn builtins_cannot_be_removed() {
        let app = helper();
        assert!(app.remove_custom(&ReminderKey::from("Hydrate_30")).is_none());
        assert_eq!(app.catalog().list().len(), 7);
    }

    #[test]
    fn announce_logs_greeting() {
        let app = helper();
        app.announce();
        assert!(app.log().lines()[0].ends_with(STARTUP_MESSAGE));
    }
}
