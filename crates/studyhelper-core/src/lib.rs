//! # Study Helper Core Library
//!
//! Periodic wellness/study reminders (hydration, stretching, eye rest, ...)
//! that can each be started and stopped independently, plus user-defined
//! custom reminders. A firing reminder raises an OS notification, or an
//! in-process popup when the OS notifier is unavailable, and is recorded in
//! an on-screen activity log.
//!
//! ## Architecture
//!
//! - **Registry**: which reminder keys are active, and with what settings
//! - **Scheduler**: one cancellable tokio task per active key
//! - **Catalog**: built-in rows plus user-added custom rows
//! - **Notifications**: native notifier with popup fallback
//! - **Activity log**: timestamped, append-only event lines
//!
//! The presentation layer owns a [`StudyHelper`] and subscribes to its
//! [`EventBus`] to render log lines and popups.

pub mod activity_log;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod notify;
pub mod registry;
pub mod reminder;
pub mod scheduler;

mod app;

pub use activity_log::{ActivityLog, ActivityLogEntry};
pub use app::StudyHelper;
pub use catalog::ReminderCatalog;
pub use config::{Config, NotificationsConfig, ReminderConfig};
pub use error::{ConfigError, CoreError, NotificationError, Result, ValidationError};
pub use events::{DismissReason, Event, EventBus};
pub use notify::{Delivery, NativeNotifier, NotificationSink, Notifier, Popup, PopupBoard};
pub use registry::{ActiveReminder, ReminderRegistry};
pub use reminder::{ReminderDefinition, ReminderKey, ReminderSource};
pub use scheduler::{ReminderScheduler, QUICK_CHECK_IN};
