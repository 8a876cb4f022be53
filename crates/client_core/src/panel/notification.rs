//! Single-slot auto-dismissing notification.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, text)
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    notification: Option<Notification>,
}

/// Holds the visible notification and its pending dismissal task.
///
/// Posting aborts the previous dismissal and schedules a fresh one. Each post
/// bumps the slot generation, and a dismissal only clears the slot if the
/// generation it was scheduled for is still current; the check and the clear
/// happen under the channel lock, so a task that already woke up cannot wipe
/// a newer notification.
pub struct Notifier {
    slot: Arc<watch::Sender<Slot>>,
    lifetime: Duration,
    dismissal: Option<JoinHandle<()>>,
}

impl Notifier {
    /// Must be used from within a tokio runtime; dismissals are spawned tasks.
    pub fn new(lifetime: Duration) -> Self {
        let (slot, _) = watch::channel(Slot::default());
        Self {
            slot: Arc::new(slot),
            lifetime,
            dismissal: None,
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.slot.borrow().notification.clone()
    }

    pub fn post(&mut self, notification: Notification) {
        self.abort_dismissal();
        tracing::debug!(
            kind = ?notification.kind,
            text = %notification.text,
            "notification posted"
        );
        let mut generation = 0;
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.notification = Some(notification);
            generation = slot.generation;
        });

        let slot = Arc::clone(&self.slot);
        let lifetime = self.lifetime;
        self.dismissal = Some(tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            clear_if_current(&slot, generation);
        }));
    }

    /// Clears the notification immediately.
    pub fn dismiss(&mut self) {
        self.abort_dismissal();
        self.slot.send_modify(|slot| {
            slot.generation += 1;
            slot.notification = None;
        });
    }

    fn abort_dismissal(&mut self) {
        if let Some(task) = self.dismissal.take() {
            task.abort();
        }
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        self.abort_dismissal();
    }
}

/// Clears the slot only if nothing was posted since `generation`.
fn clear_if_current(slot: &watch::Sender<Slot>, generation: u64) -> bool {
    slot.send_if_modified(|slot| {
        if slot.generation != generation || slot.notification.is_none() {
            return false;
        }
        slot.notification = None;
        true
    })
}

#[cfg(test)]
#[path = "tests/notification_tests.rs"]
mod tests;
