//! Append-only, timestamped activity log.
//!
//! Entries are kept in insertion order across all producers and are only
//! ever removed in bulk by [`ActivityLog::clear`]. Growth is unbounded for
//! the life of the session.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{Event, EventBus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogEntry {
    pub at: DateTime<Local>,
    pub message: String,
}

impl ActivityLogEntry {
    /// `[HH:MM:SS] message`
    pub fn line(&self) -> String {
        format!("[{}] {}", self.at.format("%H:%M:%S"), self.message)
    }
}

#[derive(Debug)]
pub struct ActivityLog {
    entries: Mutex<Vec<ActivityLogEntry>>,
    bus: EventBus,
}

impl ActivityLog {
    pub fn new(bus: EventBus) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            bus,
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<ActivityLogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn append(&self, message: impl Into<String>) -> ActivityLogEntry {
        let entry = ActivityLogEntry {
            at: Local::now(),
            message: message.into(),
        };
        // Publish while holding the lock so subscribers see appends in log order.
        let mut entries = self.entries();
        entries.push(entry.clone());
        self.bus.publish(Event::LogAppended {
            line: entry.line(),
            at: Utc::now(),
        });
        entry
    }

    pub fn clear(&self) {
        self.entries().clear();
        self.bus.publish(Event::LogCleared { at: Utc::now() });
    }

    pub fn lines(&self) -> Vec<String> {
        self.entries().iter().map(ActivityLogEntry::line).collect()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new(EventBus::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order_and_prefixes_time() {
        let log = ActivityLog::default();
        log.append("first");
        log.append("second");

        let lines = log.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("] first"));
        assert!(lines[1].ends_with("] second"));
        // "[HH:MM:SS] " is 11 chars
        assert_eq!(&lines[0][0..1], "[");
        assert_eq!(&lines[0][9..11], "] ");
    }

    #[test]
    fn clear_removes_everything() {
        let log = ActivityLog::default();
        log.append("one");
        log.clear();
        assert!(log.is_empty());
        log.append("two");
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn append_publishes_formatted_line() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let log = ActivityLog::new(bus);
        let entry = log.append("hello");

        match rx.try_recv() {
            Ok(Event::LogAppended { line, .. }) => assert_eq!(line, entry.line()),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
