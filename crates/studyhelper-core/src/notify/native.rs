use notify_rust::Notification;

use super::Notifier;
use crate::error::NotificationError;

const APP_NAME: &str = "studyhelper";

/// OS notification center via notify-rust (libnotify/D-Bus, macOS
/// notification center, Windows toasts).
#[derive(Debug, Clone, Copy)]
pub struct NativeNotifier {
    _priv: (),
}

impl NativeNotifier {
    /// Check that a notification server is reachable.
    #[cfg(all(unix, not(target_os = "macos")))]
    pub fn connect() -> Result<Self, NotificationError> {
        notify_rust::get_server_information()
            .map_err(|e| NotificationError::Unavailable(e.to_string()))?;
        Ok(Self { _priv: () })
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    pub fn connect() -> Result<Self, NotificationError> {
        Ok(Self { _priv: () })
    }
}

impl Notifier for NativeNotifier {
    fn name(&self) -> &'static str {
        "native"
    }

    fn deliver(&self, title: &str, message: &str) -> Result<(), NotificationError> {
        Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(message)
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::DeliveryFailed(e.to_string()))
    }
}
