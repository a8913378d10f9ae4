//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Notification title, OS notifier opt-out and popup dismiss delay
//! - An optional replacement for the built-in reminder list
//!
//! Configuration is read from `~/.config/studyhelper/config.toml` when it
//! exists. The file is never written; reminders themselves are not persisted.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::reminder::{builtin_reminders, ReminderDefinition};

/// Notification configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Try the OS notifier before falling back to popups.
    #[serde(default = "default_true")]
    pub native: bool,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_popup_dismiss_secs")]
    pub popup_dismiss_secs: u64,
}

/// One entry of a user-supplied built-in list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub name: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    pub interval_minutes: u32,
    pub message: String,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Replaces the default built-in reminders when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<ReminderConfig>>,
}

fn default_true() -> bool {
    true
}
fn default_title() -> String {
    "Study Reminder".into()
}
fn default_popup_dismiss_secs() -> u64 {
    10
}
fn default_icon() -> String {
    "🔔".into()
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            native: true,
            title: default_title(),
            popup_dismiss_secs: default_popup_dismiss_secs(),
        }
    }
}

/// Returns `~/.config/studyhelper/`.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studyhelper")
}

impl Config {
    pub fn path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Load from the default location, or defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notifications.popup_dismiss_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "notifications.popup_dismiss_secs".into(),
                message: "must be at least 1 second".into(),
            });
        }
        for (i, r) in self.reminders.iter().flatten().enumerate() {
            let invalid = |message: &str| ConfigError::InvalidValue {
                key: format!("reminders[{i}]"),
                message: message.to_string(),
            };
            if r.name.trim().is_empty() {
                return Err(invalid("name must not be empty"));
            }
            if r.message.trim().is_empty() {
                return Err(invalid("message must not be empty"));
            }
            if r.interval_minutes == 0 {
                return Err(invalid("interval_minutes must be positive"));
            }
        }
        Ok(())
    }

    /// The built-in catalog rows this config selects.
    pub fn builtin_definitions(&self) -> Vec<ReminderDefinition> {
        match &self.reminders {
            Some(list) => list
                .iter()
                .map(|r| ReminderDefinition::builtin(&r.name, &r.icon, r.interval_minutes, &r.message))
                .collect(),
            None => builtin_reminders(),
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        if key.is_empty() {
            return None;
        }
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
