//! Reminder scheduler.
//!
//! Runs one tokio task per active key. Each task owns a
//! [`CancellationToken`] and a drift-free interval anchored at the moment
//! the reminder was started. On every tick the task re-checks the registry
//! and fires only while its key is still active.
//!
//! ## State per key
//!
//! ```text
//! Inactive -> Active   (start / reset)
//! Active   -> Inactive (stop, or the key leaving the registry)
//! ```
//!
//! Starting an already-active key restarts it, so there is never more than
//! one task per key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::activity_log::ActivityLog;
use crate::error::ValidationError;
use crate::events::{Event, EventBus};
use crate::notify::{Delivery, NotificationSink};
use crate::registry::{ActiveReminder, ReminderRegistry};
use crate::reminder::ReminderKey;

/// Message used by the "remind me now" action.
pub const QUICK_CHECK_IN: &str = "Quick check-in: hydrate, stretch, and rest your eyes!";

fn period(interval_minutes: u32) -> Duration {
    Duration::from_secs(u64::from(interval_minutes.max(1)) * 60)
}

/// Everything a reminder task needs to fire.
#[derive(Debug, Clone)]
struct Firing {
    registry: Arc<ReminderRegistry>,
    log: Arc<ActivityLog>,
    sink: Arc<NotificationSink>,
    bus: EventBus,
}

impl Firing {
    async fn fire(&self, key: Option<&ReminderKey>, message: &str) -> Delivery {
        let delivery = self.sink.deliver(message).await;
        self.log.append(format!("🔔 {message}"));
        self.bus.publish(Event::ReminderFired {
            key: key.cloned(),
            message: message.to_string(),
            at: Utc::now(),
        });
        info!(key = ?key.map(ReminderKey::as_str), ?delivery, "reminder fired");
        delivery
    }
}

/// The live task for one key. `id` tells a restarted task from its predecessor.
#[derive(Debug)]
struct TaskHandle {
    id: u64,
    token: CancellationToken,
}

type TaskMap = HashMap<ReminderKey, TaskHandle>;

// Every operation leaves the map consistent, so a poisoned lock is safe to reuse.
fn lock_tasks(tasks: &Mutex<TaskMap>) -> MutexGuard<'_, TaskMap> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lock order is tasks, then registry.
#[derive(Debug)]
pub struct ReminderScheduler {
    firing: Firing,
    tasks: Arc<Mutex<TaskMap>>,
    next_task_id: AtomicU64,
}

impl ReminderScheduler {
    pub fn new(
        registry: Arc<ReminderRegistry>,
        log: Arc<ActivityLog>,
        sink: Arc<NotificationSink>,
        bus: EventBus,
    ) -> Self {
        Self {
            firing: Firing {
                registry,
                log,
                sink,
                bus,
            },
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_task_id: AtomicU64::new(1),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, TaskMap> {
        lock_tasks(&self.tasks)
    }

    pub fn registry(&self) -> &Arc<ReminderRegistry> {
        &self.firing.registry
    }

    pub fn log(&self) -> &Arc<ActivityLog> {
        &self.firing.log
    }

    pub fn sink(&self) -> &Arc<NotificationSink> {
        &self.firing.sink
    }

    pub fn is_active(&self, key: &ReminderKey) -> bool {
        self.firing.registry.is_active(key)
    }

    /// Number of reminder tasks that are still running.
    pub fn running_tasks(&self) -> usize {
        self.tasks()
            .values()
            .filter(|t| !t.token.is_cancelled())
            .count()
    }

    /// Start (or restart) the reminder for `key`.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveInterval` for a zero interval; nothing is started.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(
        &self,
        key: &ReminderKey,
        interval_minutes: u32,
        message: &str,
    ) -> Result<(), ValidationError> {
        if interval_minutes == 0 {
            return Err(ValidationError::NonPositiveInterval { minutes: 0 });
        }
        self.start_unchecked(key, interval_minutes, message);
        Ok(())
    }

    fn start_unchecked(&self, key: &ReminderKey, interval_minutes: u32, message: &str) {
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        {
            let mut tasks = self.tasks();
            let handle = TaskHandle {
                id,
                token: token.clone(),
            };
            if let Some(previous) = tasks.insert(key.clone(), handle) {
                previous.token.cancel();
            }
            self.firing.registry.activate(key, interval_minutes, message);
        }

        let every = period(interval_minutes);
        let mut ticker = tokio::time::interval_at(Instant::now() + every, every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let firing = self.firing.clone();
        let tasks = Arc::clone(&self.tasks);
        let task_key = key.clone();
        let message = message.to_string();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                if token.is_cancelled() || !firing.registry.is_active(&task_key) {
                    break;
                }
                firing.fire(Some(&task_key), &message).await;
            }
            let mut tasks = lock_tasks(&tasks);
            if tasks.get(&task_key).is_some_and(|t| t.id == id) {
                tasks.remove(&task_key);
            }
            debug!(key = %task_key, "reminder task exited");
        });

        info!(key = %key, interval_minutes, "reminder started");
        self.firing
            .log
            .append(format!("▶️ Started {key} (every {interval_minutes} min)"));
        self.firing.bus.publish(Event::ReminderStarted {
            key: key.clone(),
            interval_minutes,
            at: Utc::now(),
        });
    }

    /// Stop the reminder for `key`. Always logs; returns whether it was active.
    pub fn stop(&self, key: &ReminderKey) -> bool {
        let was_active = {
            let mut tasks = self.tasks();
            if let Some(handle) = tasks.remove(key) {
                handle.token.cancel();
            }
            self.firing.registry.deactivate(key)
        };
        info!(key = %key, was_active, "reminder stopped");
        self.firing.log.append(format!("⏹️ Stopped {key}"));
        self.firing.bus.publish(Event::ReminderStopped {
            key: key.clone(),
            was_active,
            at: Utc::now(),
        });
        was_active
    }

    /// Restart the countdown for an active key with the same interval and
    /// message. An inactive key only gets a notice in the log.
    pub fn reset(&self, key: &ReminderKey) -> bool {
        let Some(ActiveReminder {
            interval_minutes,
            message,
            ..
        }) = self.firing.registry.get(key)
        else {
            self.firing
                .log
                .append(format!("ℹ️ {key} reminder is not running; start it first."));
            return false;
        };

        self.stop(key);
        self.start_unchecked(key, interval_minutes, &message);
        self.firing.log.append(format!("🔄 Reset {key} timer."));
        self.firing.bus.publish(Event::ReminderReset {
            key: key.clone(),
            at: Utc::now(),
        });
        true
    }

    /// Start if inactive, stop if active. Returns whether the key is now active.
    pub fn toggle(
        &self,
        key: &ReminderKey,
        interval_minutes: u32,
        message: &str,
    ) -> Result<bool, ValidationError> {
        if self.is_active(key) {
            self.stop(key);
            Ok(false)
        } else {
            self.start(key, interval_minutes, message)?;
            Ok(true)
        }
    }

    /// Fire `message` right away without touching the registry.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn remind_now(&self, message: &str) -> JoinHandle<Delivery> {
        let firing = self.firing.clone();
        let message = message.to_string();
        tokio::spawn(async move { firing.fire(None, &message).await })
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for handle in self.tasks().values() {
            handle.token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::PopupBoard;

    fn scheduler() -> ReminderScheduler {
        let bus = EventBus::new();
        let sink = NotificationSink::fallback_only(
            "Study Reminder",
            PopupBoard::new(Duration::from_secs(10), bus.clone()),
        );
        ReminderScheduler::new(
            Arc::new(ReminderRegistry::new()),
            Arc::new(ActivityLog::new(bus.clone())),
            Arc::new(sink),
            bus,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn start_and_stop_flip_registry_immediately() {
        let s = scheduler();
        let key = ReminderKey::from("Hydrate_30");
        assert!(!s.is_active(&key));
        s.start(&key, 30, "Time to hydrate!").unwrap();
        assert!(s.is_active(&key));
        assert!(s.stop(&key));
        assert!(!s.is_active(&key));
        assert_eq!(s.running_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_rejected() {
        let s = scheduler();
        let key = ReminderKey::from("x_0");
        assert_eq!(
            s.start(&key, 0, "m"),
            Err(ValidationError::NonPositiveInterval { minutes: 0 })
        );
        assert!(!s.is_active(&key));
        assert!(s.log().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn restart_keeps_a_single_task() {
        let s = scheduler();
        let key = ReminderKey::from("Hydrate_30");
        s.start(&key, 30, "a").unwrap();
        s.start(&key, 30, "b").unwrap();
        assert_eq!(s.running_tasks(), 1);
        assert_eq!(s.registry().get(&key).unwrap().message, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_alternates() {
        let s = scheduler();
        let key = ReminderKey::from("Eye rest_20");
        assert_eq!(s.toggle(&key, 20, "Look away"), Ok(true));
        assert_eq!(s.toggle(&key, 20, "Look away"), Ok(false));
        assert!(!s.is_active(&key));
    }

    #[tokio::test(start_paused = true)]
    async fn remind_now_fires_without_registry() {
        let s = scheduler();
        let delivery = s.remind_now(QUICK_CHECK_IN).await.unwrap();
        assert!(matches!(delivery, Delivery::Popup { .. }));
        assert!(s.registry().is_empty());
        assert!(s.log().lines()[0].contains(QUICK_CHECK_IN));
    }

    #[tokio::test(start_paused = true)]
    async fn registry_deactivation_alone_ends_the_task() {
        let s = scheduler();
        let key = ReminderKey::from("Hydrate_30");
        s.start(&key, 30, "Time to hydrate!").unwrap();
        tokio::task::yield_now().await;

        assert!(s.registry().deactivate(&key));
        assert_eq!(s.running_tasks(), 1);

        tokio::time::advance(Duration::from_secs(31 * 60)).await;
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        assert!(!s.log().lines().iter().any(|l| l.contains('🔔')));
        assert_eq!(s.running_tasks(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exited_task_does_not_remove_its_successor() {
        let s = scheduler();
        let key = ReminderKey::from("Hydrate_30");
        s.start(&key, 30, "a").unwrap();
        s.registry().deactivate(&key);
        s.start(&key, 30, "b").unwrap();

        tokio::time::advance(Duration::from_secs(30 * 60)).await;
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }

        assert_eq!(s.running_tasks(), 1);
        assert!(s.is_active(&key));
        assert_eq!(s.log().lines().iter().filter(|l| l.contains("🔔 b")).count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_start_stop_keeps_registry_and_tasks_in_step() {
        let s = Arc::new(scheduler());
        let key = ReminderKey::from("Hydrate_30");

        let workers: Vec<_> = (0..8)
            .map(|n| {
                let s = Arc::clone(&s);
                let key = key.clone();
                tokio::task::spawn_blocking(move || {
                    for i in 0..200 {
                        if (i + n) % 2 == 0 {
                            s.start(&key, 30, "m").unwrap();
                        } else {
                            s.stop(&key);
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.await.unwrap();
        }

        assert_eq!(s.is_active(&key), s.running_tasks() == 1);
        assert!(s.running_tasks() <= 1);
    }
}
