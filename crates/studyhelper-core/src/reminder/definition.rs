use serde::{Deserialize, Serialize};

use super::key::{ReminderKey, ReminderSource};
use crate::error::ValidationError;

/// An immutable reminder description shown as one catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDefinition {
    pub source: ReminderSource,
    pub name: String,
    /// Presentation-only glyph.
    pub icon: String,
    pub interval_minutes: u32,
    pub message: String,
}

impl ReminderDefinition {
    pub fn builtin(name: &str, icon: &str, interval_minutes: u32, message: &str) -> Self {
        Self {
            source: ReminderSource::Builtin,
            name: name.to_string(),
            icon: icon.to_string(),
            interval_minutes,
            message: message.to_string(),
        }
    }

    /// Validate user input and build a custom definition.
    ///
    /// `interval` is the raw text the user typed; it must parse as a
    /// positive integer. Name and message are trimmed and must be non-empty.
    pub fn custom(name: &str, message: &str, interval: &str) -> Result<Self, ValidationError> {
        let interval_minutes = parse_interval(interval)?;
        let name = name.trim();
        let message = message.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField { field: "name".into() });
        }
        if message.is_empty() {
            return Err(ValidationError::EmptyField { field: "message".into() });
        }
        Ok(Self {
            source: ReminderSource::Custom,
            name: name.to_string(),
            icon: "⭐".to_string(),
            interval_minutes,
            message: message.to_string(),
        })
    }

    pub fn key(&self) -> ReminderKey {
        ReminderKey::derive(self.source, &self.name, self.interval_minutes)
    }

    /// Row label, e.g. `💧 Hydrate (every 30 min)`.
    pub fn label(&self) -> String {
        format!("{} {} (every {} min)", self.icon, self.name, self.interval_minutes)
    }
}

/// Parse a user-typed interval in minutes.
pub fn parse_interval(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let minutes: i64 = trimmed.parse().map_err(|_| ValidationError::InvalidInterval {
        input: trimmed.to_string(),
    })?;
    if minutes <= 0 {
        return Err(ValidationError::NonPositiveInterval { minutes });
    }
    u32::try_from(minutes).map_err(|_| ValidationError::InvalidInterval {
        input: trimmed.to_string(),
    })
}

/// The default built-in list.
pub fn builtin_reminders() -> Vec<ReminderDefinition> {
    vec![
        ReminderDefinition::builtin("Hydrate", "💧", 30, "Time to hydrate! Drink some water."),
        ReminderDefinition::builtin("Stand/Stretch", "🤸", 45, "Stand up and stretch your body."),
        ReminderDefinition::builtin("Movement break", "🚶", 60, "Walk around for a minute."),
        ReminderDefinition::builtin("Eye rest (20-20-20)", "👀", 20, "Look 20 ft away for 20s."),
        ReminderDefinition::builtin("Pomodoro break", "⏱️", 25, "Take a short Pomodoro break."),
        ReminderDefinition::builtin("Save your work", "💾", 15, "Save your work now."),
        ReminderDefinition::builtin("Deep breathing", "🧘", 45, "Take a deep breathing break."),
    ]
}
