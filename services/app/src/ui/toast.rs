//! services/app/src/ui/toast.rs
//!
//! A single transient notification slot with an auto-dismiss timer.
//!
//! Each shown notification gets a generation number and its own timer task.
//! The timer reports expiry over a channel; the owner feeds the event back
//! through `expire`, which ignores events from notifications that were
//! already replaced or dismissed.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Error,
        }
    }
}

/// Emitted by a timer task when its notification's display time is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired(pub u64);

struct Active {
    notification: Notification,
    generation: u64,
    cancel: CancellationToken,
}

pub struct Toaster {
    duration: Duration,
    generation: u64,
    current: Option<Active>,
    expired_tx: mpsc::UnboundedSender<Expired>,
}

impl Toaster {
    /// Creates the slot and the receiver its timers report to.
    pub fn new(duration: Duration) -> (Self, mpsc::UnboundedReceiver<Expired>) {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();
        let toaster = Self {
            duration,
            generation: 0,
            current: None,
            expired_tx,
        };
        (toaster, expired_rx)
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|a| &a.notification)
    }

    /// Replaces the current notification and starts its timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(&mut self, notification: Notification) {
        self.dismiss();
        self.generation += 1;
        let generation = self.generation;
        let cancel = CancellationToken::new();

        let token = cancel.clone();
        let tx = self.expired_tx.clone();
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    let _ = tx.send(Expired(generation));
                }
            }
        });

        debug!(generation, message = %notification.message, "Notification shown");
        self.current = Some(Active {
            notification,
            generation,
            cancel,
        });
    }

    /// Hides the current notification and cancels its timer.
    pub fn dismiss(&mut self) {
        if let Some(active) = self.current.take() {
            active.cancel.cancel();
        }
    }

    /// Applies a timer event. Returns whether it dismissed anything.
    pub fn expire(&mut self, event: Expired) -> bool {
        match &self.current {
            Some(active) if active.generation == event.0 => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_the_delay() {
        let (mut toaster, mut expired) = Toaster::new(Duration::from_millis(3000));
        toaster.show(Notification::success("Ticket created successfully"));

        let started = tokio::time::Instant::now();
        let event = expired.recv().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(3000));
        assert!(toaster.expire(event));
        assert!(toaster.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn replacement_restarts_the_timer() {
        let (mut toaster, mut expired) = Toaster::new(Duration::from_millis(3000));
        toaster.show(Notification::success("first"));
        tokio::time::sleep(Duration::from_millis(2000)).await;
        toaster.show(Notification::error("second"));

        let event = expired.recv().await.unwrap();
        assert_eq!(event, Expired(2));
        assert_eq!(toaster.current().unwrap().message, "second");
        assert!(toaster.expire(event));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_does_not_dismiss_replacement() {
        let (mut toaster, _expired) = Toaster::new(Duration::from_millis(3000));
        toaster.show(Notification::success("first"));
        toaster.show(Notification::success("second"));
        assert!(!toaster.expire(Expired(1)));
        assert_eq!(toaster.current().unwrap().message, "second");
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_cancels_the_timer() {
        let (mut toaster, mut expired) = Toaster::new(Duration::from_millis(3000));
        toaster.show(Notification::error("Invalid credentials"));
        toaster.dismiss();
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(expired.try_recv().is_err());
        assert!(toaster.current().is_none());
    }
}
