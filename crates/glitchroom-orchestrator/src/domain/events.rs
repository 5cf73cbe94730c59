//! Domain events recorded in a game's journal.

use glitchroom_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

use super::messages::MessageId;
use super::phase::{TransitionCause, TransitionState};

/// Emitted when the game enters a new phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseEntered {
    /// The phase that was left.
    pub from: TransitionState,
    /// The phase that was entered.
    pub to: TransitionState,
    /// What triggered the transition.
    pub cause: TransitionCause,
}

/// Emitted when a module is added to the completion set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleCompleted {
    /// The completed module.
    pub module: usize,
}

/// Emitted when a message is posted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePosted {
    /// The new message.
    pub message_id: MessageId,
    /// Its text.
    pub text: String,
}

/// Emitted when a message decays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageExpired {
    /// The expired message.
    pub message_id: MessageId,
}

/// Emitted when displayed messages are bulk-cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesCleared {
    /// How many messages were removed.
    pub count: usize,
}

/// Event type identifier for [`PhaseEntered`].
pub const PHASE_ENTERED_EVENT_TYPE: &str = "orchestrator.phase_entered";

/// Event type identifier for [`ModuleCompleted`].
pub const MODULE_COMPLETED_EVENT_TYPE: &str = "orchestrator.module_completed";

/// Event type identifier for [`MessagePosted`].
pub const MESSAGE_POSTED_EVENT_TYPE: &str = "orchestrator.message_posted";

/// Event type identifier for [`MessageExpired`].
pub const MESSAGE_EXPIRED_EVENT_TYPE: &str = "orchestrator.message_expired";

/// Event type identifier for [`MessagesCleared`].
pub const MESSAGES_CLEARED_EVENT_TYPE: &str = "orchestrator.messages_cleared";

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEventKind {
    /// A phase was entered.
    PhaseEntered(PhaseEntered),
    /// A module was completed.
    ModuleCompleted(ModuleCompleted),
    /// A message was posted.
    MessagePosted(MessagePosted),
    /// A message decayed.
    MessageExpired(MessageExpired),
    /// Messages were bulk-cleared.
    MessagesCleared(MessagesCleared),
}

impl GameEventKind {
    /// The event type identifier of this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::PhaseEntered(_) => PHASE_ENTERED_EVENT_TYPE,
            Self::ModuleCompleted(_) => MODULE_COMPLETED_EVENT_TYPE,
            Self::MessagePosted(_) => MESSAGE_POSTED_EVENT_TYPE,
            Self::MessageExpired(_) => MESSAGE_EXPIRED_EVENT_TYPE,
            Self::MessagesCleared(_) => MESSAGES_CLEARED_EVENT_TYPE,
        }
    }
}

/// Journal entry of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
