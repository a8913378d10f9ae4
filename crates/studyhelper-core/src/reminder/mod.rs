mod definition;
mod key;

pub use definition::{builtin_reminders, parse_interval, ReminderDefinition};
pub use key::{ReminderKey, ReminderSource};
