// Transient user notifications raised by the controllers

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NotificationKind::Info => "info",
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub raised_at: Instant,
}

/// Holds notifications until they expire.
///
/// Newly raised notifications are also queued for the view to print once
/// (`drain_new`); `active` reports what is still on screen.
#[derive(Debug)]
pub struct NotificationCenter {
    timeout: Duration,
    shown: VecDeque<Notification>,
    pending: VecDeque<Notification>,
}

impl NotificationCenter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            shown: VecDeque::new(),
            pending: VecDeque::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn push(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.push_at(kind, message, Instant::now());
    }

    pub fn push_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        let notification = Notification {
            kind,
            message: message.into(),
            raised_at: now,
        };
        match kind {
            NotificationKind::Error => tracing::warn!(message = %notification.message, "Notification"),
            _ => tracing::info!(message = %notification.message, "Notification"),
        }
        self.prune(now);
        self.pending.push_back(notification.clone());
        self.shown.push_back(notification);
    }

    fn prune(&mut self, now: Instant) {
        let timeout = self.timeout;
        self.shown
            .retain(|n| now.saturating_duration_since(n.raised_at) < timeout);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NotificationKind::Error, message);
    }

    /// Notifications raised since the last call
    pub fn drain_new(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    /// Drop expired notifications and return the ones still visible at `now`
    pub fn active(&mut self, now: Instant) -> Vec<&Notification> {
        self.prune(now);
        self.shown.iter().collect()
    }

    /// Most recent notification still held
    pub fn last(&self) -> Option<&Notification> {
        self.shown.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notifications_expire_after_timeout() {
        let mut center = NotificationCenter::new(Duration::from_millis(5000));
        let t0 = Instant::now();
        center.push_at(NotificationKind::Error, "boom", t0);
        center.push_at(NotificationKind::Info, "later", t0 + Duration::from_millis(3000));

        assert_eq!(center.active(t0 + Duration::from_millis(4999)).len(), 2);
        let active = center.active(t0 + Duration::from_millis(5000));
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, "later");
        assert!(center.active(t0 + Duration::from_millis(9000)).is_empty());
    }

    #[test]
    fn test_pushing_drops_expired_notifications() {
        let mut center = NotificationCenter::new(Duration::from_millis(100));
        let t0 = Instant::now();
        for i in 0..50 {
            center.push_at(NotificationKind::Info, format!("n{}", i), t0);
        }
        assert_eq!(center.shown.len(), 50);

        center.push_at(NotificationKind::Error, "fresh", t0 + Duration::from_millis(100));
        assert_eq!(center.shown.len(), 1);
        assert_eq!(center.last().map(|n| n.message.as_str()), Some("fresh"));
        // Printing is independent of expiry
        assert_eq!(center.drain_new().len(), 51);
    }

    #[test]
    fn test_drain_new_returns_each_once() {
        let mut center = NotificationCenter::new(Duration::from_secs(5));
        center.success("saved");
        center.error("failed");
        let drained = center.drain_new();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].kind, NotificationKind::Success);
        assert!(center.drain_new().is_empty());
        assert_eq!(center.last().map(|n| n.message.as_str()), Some("failed"));
    }
}
