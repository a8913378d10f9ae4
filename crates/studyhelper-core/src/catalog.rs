//! Built-in and user-defined reminder rows.
//!
//! Built-ins are fixed when the catalog is created. Custom definitions are
//! appended by [`ReminderCatalog::add_custom`] and only ever removed, never
//! edited. Adding a custom reminder whose key already exists returns the
//! existing definition instead of creating a second row, and the logged
//! variant says so rather than reporting an add.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::info;

use crate::activity_log::ActivityLog;
use crate::error::ValidationError;
use crate::reminder::{ReminderDefinition, ReminderKey};
use crate::scheduler::ReminderScheduler;

#[derive(Debug)]
pub struct ReminderCatalog {
    builtins: Vec<ReminderDefinition>,
    custom: Mutex<Vec<ReminderDefinition>>,
}

impl ReminderCatalog {
    pub fn new(builtins: Vec<ReminderDefinition>) -> Self {
        Self {
            builtins,
            custom: Mutex::new(Vec::new()),
        }
    }

    fn custom(&self) -> MutexGuard<'_, Vec<ReminderDefinition>> {
        self.custom.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn customs(&self) -> Vec<ReminderDefinition> {
        self.custom().clone()
    }

    /// Built-ins followed by custom reminders in the order they were added.
    pub fn list(&self) -> Vec<ReminderDefinition> {
        let mut all = self.builtins.clone();
        all.extend(self.custom().iter().cloned());
        all
    }

    pub fn find(&self, key: &ReminderKey) -> Option<ReminderDefinition> {
        self.builtins
            .iter()
            .find(|d| &d.key() == key)
            .cloned()
            .or_else(|| self.custom().iter().find(|d| &d.key() == key).cloned())
    }

    /// Validate and add a custom reminder.
    ///
    /// `interval` is user text and must parse as a positive integer.
    pub fn add_custom(
        &self,
        name: &str,
        message: &str,
        interval: &str,
    ) -> Result<ReminderDefinition, ValidationError> {
        self.insert_custom(name, message, interval).map(|(def, _)| def)
    }

    /// The stored definition, and whether it was newly added.
    fn insert_custom(
        &self,
        name: &str,
        message: &str,
        interval: &str,
    ) -> Result<(ReminderDefinition, bool), ValidationError> {
        let def = ReminderDefinition::custom(name, message, interval)?;
        let key = def.key();
        let mut custom = self.custom();
        if let Some(existing) = custom.iter().find(|d| d.key() == key) {
            return Ok((existing.clone(), false));
        }
        custom.push(def.clone());
        info!(key = %key, "custom reminder added");
        Ok((def, true))
    }

    /// [`add_custom`](Self::add_custom) with the outcome reported in `log`.
    pub fn add_custom_logged(
        &self,
        name: &str,
        message: &str,
        interval: &str,
        log: &ActivityLog,
    ) -> Result<ReminderDefinition, ValidationError> {
        match self.insert_custom(name, message, interval) {
            Ok((def, true)) => {
                log.append(format!("✅ Added custom reminder: {}", def.name));
                Ok(def)
            }
            Ok((def, false)) => {
                log.append(format!("ℹ️ Custom reminder already exists: {}", def.name));
                Ok(def)
            }
            Err(e) => {
                log.append(format!("❌ {}", e.user_notice()));
                Err(e)
            }
        }
    }

    /// Stop the reminder if it is running, then drop its definition.
    ///
    /// Only custom reminders can be removed; returns `None` for built-in or
    /// unknown keys.
    pub fn remove_custom(
        &self,
        key: &ReminderKey,
        scheduler: &ReminderScheduler,
    ) -> Option<ReminderDefinition> {
        if !self.custom().iter().any(|d| &d.key() == key) {
            return None;
        }
        if scheduler.is_active(key) {
            scheduler.stop(key);
        }
        let removed = {
            let mut custom = self.custom();
            let position = custom.iter().position(|d| &d.key() == key)?;
            custom.remove(position)
        };
        info!(key = %key, "custom reminder removed");
        scheduler
            .log()
            .append(format!("🗑️ Removed custom reminder: {}", removed.name));
        Some(removed)
    }
}
