//! The engine's single repeating tick task
//!
//! The engine does not own a timer itself. It owns the identity of the one
//! task that is allowed to drive it; whatever clock the front-end uses mirrors
//! [`TickSchedule::active`] and hands the handle back with every delivery.

use std::time::Duration;

/// Identity of one scheduled repeating tick task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickHandle {
    id: u64,
    interval: Duration,
}

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

#[derive(Debug, Default)]
pub struct TickSchedule {
    next_id: u64,
    active: Option<TickHandle>,
}

impl TickSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any active task and replace it with a new one
    pub fn schedule(&mut self, interval: Duration) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle {
            id: self.next_id,
            interval,
        };
        self.active = Some(handle);
        handle
    }

    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<TickHandle> {
        self.active
    }

    pub fn is_current(&self, handle: TickHandle) -> bool {
        self.active == Some(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_replaces_previous() {
        let mut schedule = TickSchedule::new();
        let first = schedule.schedule(Duration::from_millis(500));
        let second = schedule.schedule(Duration::from_millis(500));

        assert_ne!(first, second);
        assert!(!schedule.is_current(first));
        assert!(schedule.is_current(second));
        assert_eq!(schedule.active(), Some(second));
    }

    #[test]
    fn test_cancel_invalidates_handle() {
        let mut schedule = TickSchedule::new();
        let handle = schedule.schedule(Duration::from_millis(100));
        schedule.cancel();

        assert!(schedule.active().is_none());
        assert!(!schedule.is_current(handle));

        // ids never repeat after a cancel
        let next = schedule.schedule(Duration::from_millis(100));
        assert!(next.id() > handle.id());
    }
}
