//! Timer registry, the single source of truth for outstanding delayed
//! actions.
//!
//! Timers carry data, not closures: firing a timer hands its action back to
//! the owner, which dispatches it. Time only moves when the owner asks for
//! due timers at a given instant.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use glitchroom_core::clock::deadline_after;
use serde::Serialize;

use super::messages::MessageId;
use super::phase::TransitionState;

/// Identity of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TimerHandle(u64);

/// The actions a game schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Decay of a displayed message.
    ExpireMessage(MessageId),
    /// The follow-up of the phase that scheduled it.
    FollowUp(TransitionState),
    /// A module's deferred completion report.
    ReportCompletion(usize),
}

/// A timer that reached its deadline and was removed from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredTimer<A> {
    /// The handle it was scheduled under.
    pub handle: TimerHandle,
    /// The instant it was due.
    pub deadline: DateTime<Utc>,
    /// The scheduled action.
    pub action: A,
}

#[derive(Debug)]
struct PendingTimer<A> {
    deadline: DateTime<Utc>,
    action: A,
}

/// Outstanding timers, keyed by handle.
///
/// Every entry is a timer that has neither fired nor been cancelled.
#[derive(Debug)]
pub struct TimerRegistry<A> {
    next_id: u64,
    pending: BTreeMap<TimerHandle, PendingTimer<A>>,
}

impl<A> TimerRegistry<A> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Schedules `action` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: DateTime<Utc>, delay: Duration, action: A) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.insert(
            handle,
            PendingTimer {
                deadline: deadline_after(now, delay),
                action,
            },
        );
        handle
    }

    /// Cancels a pending timer. Returns `false` if it already fired or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.pending.remove(&handle).is_some()
    }

    /// Whether `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.contains_key(&handle)
    }

    /// Deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, handle: TimerHandle) -> Option<DateTime<Utc>> {
        self.pending.get(&handle).map(|timer| timer.deadline)
    }

    /// The earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.values().map(|timer| timer.deadline).min()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns the earliest timer due at `now`.
    ///
    /// Timers sharing a deadline fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<FiredTimer<A>> {
        let handle = self
            .pending
            .iter()
            .filter(|(_, timer)| timer.deadline <= now)
            .min_by_key(|(handle, timer)| (timer.deadline, **handle))
            .map(|(handle, _)| *handle)?;

        self.pending.remove(&handle).map(|timer| FiredTimer {
            handle,
            deadline: timer.deadline,
            action: timer.action,
        })
    }
}

impl<A> Default for TimerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitchroom_test_support::test_epoch;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_timer_fires_once_deadline_is_reached() {
        // Arrange
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(start, secs(10), "follow-up");

        // Act
        let early = timers.pop_due(deadline_after(start, secs(9)));
        let due = timers.pop_due(deadline_after(start, secs(10)));

        // Assert
        assert!(early.is_none());
        let fired = due.unwrap();
        assert_eq!(fired.handle, handle);
        assert_eq!(fired.action, "follow-up");
        assert_eq!(fired.deadline, deadline_after(start, secs(10)));
        assert!(timers.is_empty());
        assert!(timers.pop_due(deadline_after(start, secs(60))).is_none());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        // Arrange
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(start, secs(30), ());

        // Act
        let cancelled = timers.cancel(handle);

        // Assert
        assert!(cancelled);
        assert!(!timers.is_pending(handle));
        assert!(timers.pop_due(deadline_after(start, secs(3600))).is_none());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(start, secs(1), ());

        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_cancel_after_fire_is_a_no_op() {
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(start, secs(1), ());

        assert!(timers.pop_due(deadline_after(start, secs(1))).is_some());

        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_cancel_in_the_fire_instant_wins() {
        // Arrange
        let start = test_epoch();
        let deadline = deadline_after(start, secs(5));
        let mut timers = TimerRegistry::new();
        let handle = timers.schedule(start, secs(5), ());

        // Act
        timers.cancel(handle);

        // Assert
        assert!(timers.pop_due(deadline).is_none());
    }

    #[test]
    fn test_due_timers_fire_in_deadline_then_schedule_order() {
        // Arrange
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        timers.schedule(start, secs(20), "late");
        timers.schedule(start, secs(5), "first");
        timers.schedule(start, secs(5), "second");
        let later = deadline_after(start, secs(60));

        // Act
        let order: Vec<_> = std::iter::from_fn(|| timers.pop_due(later))
            .map(|fired| fired.action)
            .collect();

        // Assert
        assert_eq!(order, vec!["first", "second", "late"]);
    }

    #[test]
    fn test_next_deadline_tracks_earliest_pending() {
        let start = test_epoch();
        let mut timers = TimerRegistry::new();
        assert_eq!(timers.next_deadline(), None);

        let soon = timers.schedule(start, secs(3), ());
        timers.schedule(start, secs(8), ());
        assert_eq!(timers.next_deadline(), Some(deadline_after(start, secs(3))));

        timers.cancel(soon);
        assert_eq!(timers.next_deadline(), Some(deadline_after(start, secs(8))));
        assert_eq!(timers.len(), 1);
    }
}
