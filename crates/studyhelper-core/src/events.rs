use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::reminder::ReminderKey;

/// Every state change in the system produces an Event.
/// The presentation layer subscribes to render the log and popups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ReminderStarted {
        key: ReminderKey,
        interval_minutes: u32,
        at: DateTime<Utc>,
    },
    ReminderStopped {
        key: ReminderKey,
        /// False when the key was not active (idempotent stop).
        was_active: bool,
        at: DateTime<Utc>,
    },
    ReminderFired {
        key: Option<ReminderKey>,
        message: String,
        at: DateTime<Utc>,
    },
    ReminderReset {
        key: ReminderKey,
        at: DateTime<Utc>,
    },
    LogAppended {
        line: String,
        at: DateTime<Utc>,
    },
    LogCleared {
        at: DateTime<Utc>,
    },
    PopupShown {
        id: u64,
        title: String,
        message: String,
        dismiss_at: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    PopupDismissed {
        id: u64,
        reason: DismissReason,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DismissReason {
    Acknowledged,
    Expired,
}

const EVENT_CAPACITY: usize = 256;

/// Fan-out of [`Event`]s to any number of subscribers.
///
/// Publishing never fails: with no subscribers the event is dropped, and a
/// subscriber that falls behind sees `RecvError::Lagged` rather than
/// blocking producers.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: Event) {
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
