//! Transient toast notifications.
//!
//! A small auto-expiring queue, decoupled from any single view region.
//! Errors linger longer than informational messages so the user has a
//! chance to read the retry guidance.

use std::collections::VecDeque;
use std::time::Instant;

/// Notification kind - affects duration and styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeKind {
    #[default]
    Info,
    Success,
    Error,
}

impl NoticeKind {
    /// Duration in seconds before the notice expires
    pub fn duration_secs(&self) -> u64 {
        match self {
            NoticeKind::Info => 3,
            NoticeKind::Success => 4,
            NoticeKind::Error => 10, // Errors stay longer
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub kind: NoticeKind,
    pub created_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created_at).as_secs() >= self.kind.duration_secs()
    }
}

/// FIFO queue of live notices. The renderer shows the newest few; the
/// runtime loop sweeps expired entries every tick.
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NoticeKind, message: &str) {
        self.queue.push_back(Notice {
            message: message.to_string(),
            kind,
            created_at: Instant::now(),
        });
        // Keep the queue bounded; very old entries would expire anyway.
        while self.queue.len() > 8 {
            self.queue.pop_front();
        }
    }

    pub fn info(&mut self, message: &str) {
        self.push(NoticeKind::Info, message);
    }

    pub fn success(&mut self, message: &str) {
        self.push(NoticeKind::Success, message);
    }

    pub fn error(&mut self, message: &str) {
        self.push(NoticeKind::Error, message);
    }

    /// Drop every notice whose lifetime has elapsed.
    pub fn clear_expired(&mut self, now: Instant) {
        self.queue.retain(|n| !n.is_expired(now));
    }

    /// Most recent notice, if any is still live.
    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_latest_is_newest() {
        let mut notices = Notifications::new();
        notices.info("first");
        notices.error("second");
        assert_eq!(notices.latest().unwrap().message, "second");
        assert_eq!(notices.latest().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_clear_expired_sweeps_old_notices() {
        let mut notices = Notifications::new();
        notices.info("short lived");
        let now = Instant::now();
        notices.clear_expired(now);
        assert!(!notices.is_empty());
        notices.clear_expired(now + Duration::from_secs(5));
        assert!(notices.is_empty());
    }

    #[test]
    fn test_errors_outlive_info() {
        let mut notices = Notifications::new();
        notices.info("info");
        notices.error("error");
        let later = Instant::now() + Duration::from_secs(5);
        notices.clear_expired(later);
        assert_eq!(notices.latest().unwrap().message, "error");
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut notices = Notifications::new();
        for i in 0..20 {
            notices.info(&format!("notice {}", i));
        }
        assert!(notices.iter().count() <= 8);
        assert_eq!(notices.latest().unwrap().message, "notice 19");
    }
}
