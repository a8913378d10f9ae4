//! In-memory record of which reminders are running.
//!
//! A key is active iff it is present here. The scheduler's start/stop/reset
//! mutate the map; reminder tasks and the presentation layer read it
//! concurrently. A task whose key disappears exits on its next tick.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::reminder::ReminderKey;

/// Metadata for one running reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveReminder {
    pub interval_minutes: u32,
    pub message: String,
    pub started_at: DateTime<Utc>,
}

impl ActiveReminder {
    pub fn interval(&self) -> Duration {
        Duration::minutes(i64::from(self.interval_minutes))
    }

    /// The first firing boundary strictly after `now`.
    pub fn next_fire_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let period = self.interval();
        if now < self.started_at || period <= Duration::zero() {
            return self.started_at + period;
        }
        let elapsed = (now - self.started_at).num_milliseconds();
        let period_ms = period.num_milliseconds();
        let periods = elapsed / period_ms + 1;
        self.started_at + Duration::milliseconds(periods * period_ms)
    }
}

#[derive(Debug, Default)]
pub struct ReminderRegistry {
    active: Mutex<HashMap<ReminderKey, ActiveReminder>>,
}

impl ReminderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every operation leaves the map consistent, so a poisoned lock is safe to reuse.
    fn entries(&self) -> MutexGuard<'_, HashMap<ReminderKey, ActiveReminder>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self, key: &ReminderKey) -> bool {
        self.entries().contains_key(key)
    }

    /// Insert or overwrite the entry for `key`, stamped with the current time.
    pub fn activate(&self, key: &ReminderKey, interval_minutes: u32, message: &str) {
        self.entries().insert(
            key.clone(),
            ActiveReminder {
                interval_minutes,
                message: message.to_string(),
                started_at: Utc::now(),
            },
        );
    }

    /// Remove the entry for `key`. Returns whether it was present.
    pub fn deactivate(&self, key: &ReminderKey) -> bool {
        self.entries().remove(key).is_some()
    }

    pub fn get(&self, key: &ReminderKey) -> Option<ActiveReminder> {
        self.entries().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
