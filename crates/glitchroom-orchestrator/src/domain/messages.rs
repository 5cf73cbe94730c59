//! Message store. Holds the narrative messages currently on screen.

use std::time::Duration;

use chrono::{DateTime, Utc};
use glitchroom_core::clock::deadline_after;
use serde::{Deserialize, Serialize};

use super::timers::{TimerAction, TimerHandle, TimerRegistry};

/// Identity of a displayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

/// A displayed message and the timer that will remove it.
#[derive(Debug, Clone)]
pub struct Message {
    /// Message identity.
    pub id: MessageId,
    /// Text shown to the user.
    pub text: String,
    /// How long the message stays up.
    pub ttl: Duration,
    /// When it was posted.
    pub posted_at: DateTime<Utc>,
    decay: TimerHandle,
}

impl Message {
    /// The instant this message decays.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        deadline_after(self.posted_at, self.ttl)
    }
}

/// Presentation projection of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageView {
    /// Message identity.
    pub id: MessageId,
    /// Text shown to the user.
    pub text: String,
}

/// Messages in insertion order; the most recent is last.
#[derive(Debug, Default)]
pub struct MessageStore {
    next_id: u64,
    messages: Vec<Message>,
}

impl MessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and schedules its decay after `ttl`.
    pub fn add(
        &mut self,
        timers: &mut TimerRegistry<TimerAction>,
        now: DateTime<Utc>,
        text: impl Into<String>,
        ttl: Duration,
    ) -> MessageId {
        self.next_id += 1;
        let id = MessageId(self.next_id);
        let decay = timers.schedule(now, ttl, TimerAction::ExpireMessage(id));
        self.messages.push(Message {
            id,
            text: text.into(),
            ttl,
            posted_at: now,
            decay,
        });
        id
    }

    /// Removes a message ahead of its decay. No-op if it is already gone.
    pub fn remove(&mut self, timers: &mut TimerRegistry<TimerAction>, id: MessageId) -> bool {
        match self.take(id) {
            Some(message) => {
                timers.cancel(message.decay);
                true
            }
            None => false,
        }
    }

    /// Removes a message whose decay timer has fired.
    pub(crate) fn expire(&mut self, id: MessageId) -> bool {
        self.take(id).is_some()
    }

    /// Removes every message and cancels every decay timer. Returns how many
    /// messages were removed.
    pub fn clear(&mut self, timers: &mut TimerRegistry<TimerAction>) -> usize {
        let count = self.messages.len();
        for message in self.messages.drain(..) {
            timers.cancel(message.decay);
        }
        count
    }

    /// Looks up a displayed message.
    #[must_use]
    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|message| message.id == id)
    }

    /// Presentation projection, oldest first.
    #[must_use]
    pub fn visible(&self) -> Vec<MessageView> {
        self.messages
            .iter()
            .map(|message| MessageView {
                id: message.id,
                text: message.text.clone(),
            })
            .collect()
    }

    /// Number of displayed messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether nothing is displayed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn take(&mut self, id: MessageId) -> Option<Message> {
        let position = self.messages.iter().position(|message| message.id == id)?;
        Some(self.messages.remove(position))
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
    fn test_add_keeps_insertion_order_and_schedules_decay() {
        // Arrange
        let now = test_epoch();
        let mut timers = TimerRegistry::new();
        let mut store = MessageStore::new();

        // Act
        let first = store.add(&mut timers, now, "first", secs(5));
        let second = store.add(&mut timers, now, "second", secs(5));

        // Assert
        let texts: Vec<_> = store.visible().into_iter().map(|m| m.text).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert_ne!(first, second);
        assert_eq!(timers.len(), 2);
        assert_eq!(
            store.get(first).unwrap().expires_at(),
            deadline_after(now, secs(5))
        );
    }

    #[test]
    fn test_decay_timer_carries_expire_action() {
        // Arrange
        let now = test_epoch();
        let mut timers = TimerRegistry::new();
        let mut store = MessageStore::new();
        let id = store.add(&mut timers, now, "hello", secs(5));

        // Act
        let fired = timers.pop_due(deadline_after(now, secs(5))).unwrap();
        let expired = store.expire(id);

        // Assert
        assert_eq!(fired.action, TimerAction::ExpireMessage(id));
        assert!(expired);
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_cancels_decay_and_tolerates_missing_ids() {
        // Arrange
        let now = test_epoch();
        let mut timers = TimerRegistry::new();
        let mut store = MessageStore::new();
        let id = store.add(&mut timers, now, "bye", secs(5));

        // Act
        let removed = store.remove(&mut timers, id);
        let removed_again = store.remove(&mut timers, id);

        // Assert
        assert!(removed);
        assert!(!removed_again);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_clear_only_cancels_message_timers() {
        // Arrange
        let now = test_epoch();
        let mut timers = TimerRegistry::new();
        let follow_up = timers.schedule(
            now,
            secs(30),
            TimerAction::FollowUp(crate::domain::phase::TransitionState::Welcoming),
        );
        let mut store = MessageStore::new();
        store.add(&mut timers, now, "a", secs(5));
        store.add(&mut timers, now, "b", secs(50));

        // Act
        let cleared = store.clear(&mut timers);

        // Assert
        assert_eq!(cleared, 2);
        assert!(store.is_empty());
        assert_eq!(timers.len(), 1);
        assert!(timers.is_pending(follow_up));
    }
}
