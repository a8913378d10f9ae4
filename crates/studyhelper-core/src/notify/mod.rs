//! Best-effort reminder delivery.
//!
//! [`NotificationSink`] tries the OS notifier first and falls back to an
//! in-process [`PopupBoard`] on any failure. Callers never see an error.
//! Which backends are available is decided once at startup by
//! [`NotificationSink::detect`].

mod native;
mod popup;

pub use native::NativeNotifier;
pub use popup::{Popup, PopupBoard};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::NotificationsConfig;
use crate::error::NotificationError;
use crate::events::EventBus;

/// A notification backend.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn deliver(&self, title: &str, message: &str) -> Result<(), NotificationError>;
}

/// How a notification ended up being shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Native,
    Popup { id: u64 },
}

pub struct NotificationSink {
    title: String,
    native: Option<Arc<dyn Notifier>>,
    popups: PopupBoard,
}

impl NotificationSink {
    pub fn new(title: impl Into<String>, native: Option<Arc<dyn Notifier>>, popups: PopupBoard) -> Self {
        Self {
            title: title.into(),
            native,
            popups,
        }
    }

    /// Popup-only sink.
    pub fn fallback_only(title: impl Into<String>, popups: PopupBoard) -> Self {
        Self::new(title, None, popups)
    }

    /// Build a sink from config, checking once whether the OS notifier is reachable.
    pub fn detect(config: &NotificationsConfig, bus: EventBus) -> Self {
        let popups = PopupBoard::new(Duration::from_secs(config.popup_dismiss_secs), bus);
        if !config.native {
            debug!("native notifications disabled by config");
            return Self::fallback_only(&config.title, popups);
        }
        match NativeNotifier::connect() {
            Ok(notifier) => Self::new(&config.title, Some(Arc::new(notifier)), popups),
            Err(e) => {
                warn!(error = %e, "native notifications unavailable, using popups");
                Self::fallback_only(&config.title, popups)
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn popups(&self) -> &PopupBoard {
        &self.popups
    }

    pub fn has_native(&self) -> bool {
        self.native.is_some()
    }

    /// Deliver `message`. Never fails.
    ///
    /// The native backend may block on OS IPC, so it runs on tokio's
    /// blocking pool; popups are shown inline.
    pub async fn deliver(&self, message: &str) -> Delivery {
        let Some(native) = self.native.clone() else {
            return self.popup(message);
        };
        let backend = native.name();
        let title = self.title.clone();
        let body = message.to_string();
        match tokio::task::spawn_blocking(move || native.deliver(&title, &body)).await {
            Ok(Ok(())) => Delivery::Native,
            Ok(Err(e)) => {
                warn!(backend, error = %e, "notification failed, showing popup");
                self.popup(message)
            }
            Err(e) => {
                warn!(backend, error = %e, "notification task died, showing popup");
                self.popup(message)
            }
        }
    }

    fn popup(&self, message: &str) -> Delivery {
        let popup = self.popups.show(&self.title, message);
        Delivery::Popup { id: popup.id }
    }
}

impl std::fmt::Debug for NotificationSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationSink")
            .field("title", &self.title)
            .field("native", &self.native.as_ref().map(|n| n.name()))
            .field("popups", &self.popups)
            .finish()
    }
}
