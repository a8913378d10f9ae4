//! Reminder identity.
//!
//! A key is derived from (source, name, interval). Built-in keys read
//! `"{name}_{minutes}"` and custom keys `"custom_{name}_{minutes}"`, so two
//! definitions with the same name and interval from the same source share a
//! key and therefore share a running timer.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderSource {
    Builtin,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderKey(String);

impl ReminderKey {
    pub fn derive(source: ReminderSource, name: &str, interval_minutes: u32) -> Self {
        match source {
            ReminderSource::Builtin => Self(format!("{name}_{interval_minutes}")),
            ReminderSource::Custom => Self(format!("custom_{name}_{interval_minutes}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReminderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReminderKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ReminderKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}
