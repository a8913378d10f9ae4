//! In-process fallback popups.
//!
//! A popup stays visible until acknowledged or until its dismiss delay
//! elapses. When a tokio runtime is available an expiry timer removes the
//! popup and publishes `PopupDismissed`; reads also prune expired popups so
//! the board stays correct without a runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::{DismissReason, Event, EventBus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popup {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub dismiss_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Inner {
    next_id: AtomicU64,
    popups: Mutex<Vec<Popup>>,
    dismiss_after: Duration,
    bus: EventBus,
}

/// Shared handle to the set of visible popups.
#[derive(Debug, Clone)]
pub struct PopupBoard {
    inner: Arc<Inner>,
}

impl PopupBoard {
    pub fn new(dismiss_after: Duration, bus: EventBus) -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                popups: Mutex::new(Vec::new()),
                dismiss_after,
                bus,
            }),
        }
    }

    fn popups(&self) -> MutexGuard<'_, Vec<Popup>> {
        self.inner.popups.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn show(&self, title: &str, message: &str) -> Popup {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let shown_at = Utc::now();
        let dismiss_at = shown_at
            + chrono::Duration::from_std(self.inner.dismiss_after)
                .unwrap_or_else(|_| chrono::Duration::seconds(10));
        let popup = Popup {
            id,
            title: title.to_string(),
            message: message.to_string(),
            shown_at,
            dismiss_at,
        };
        self.popups().push(popup.clone());
        self.inner.bus.publish(Event::PopupShown {
            id,
            title: popup.title.clone(),
            message: popup.message.clone(),
            dismiss_at,
            at: shown_at,
        });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let board = self.clone();
            let delay = self.inner.dismiss_after;
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                board.remove(id, DismissReason::Expired);
            });
        }
        popup
    }

    /// Explicit user acknowledgment. Returns false if the popup is already gone.
    pub fn acknowledge(&self, id: u64) -> bool {
        self.remove(id, DismissReason::Acknowledged)
    }

    fn remove(&self, id: u64, reason: DismissReason) -> bool {
        let removed = {
            let mut popups = self.popups();
            let before = popups.len();
            popups.retain(|p| p.id != id);
            popups.len() != before
        };
        if removed {
            self.inner.bus.publish(Event::PopupDismissed {
                id,
                reason,
                at: Utc::now(),
            });
        }
        removed
    }

    /// Popups still on screen, oldest first.
    pub fn visible(&self) -> Vec<Popup> {
        self.visible_at(Utc::now())
    }

    /// Popups still on screen at `now`. Anything past its dismiss time is
    /// removed here as `Expired`, exactly as the timer would.
    pub fn visible_at(&self, now: DateTime<Utc>) -> Vec<Popup> {
        let (live, expired): (Vec<Popup>, Vec<Popup>) =
            self.popups().iter().cloned().partition(|p| p.dismiss_at > now);
        for popup in expired {
            self.remove(popup.id, DismissReason::Expired);
        }
        live
    }
}
