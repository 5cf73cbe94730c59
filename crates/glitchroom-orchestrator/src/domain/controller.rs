//! Transition controller: the state machine that sequences a game.
//!
//! Every entry into a skippable phase schedules exactly one follow-up timer.
//! The previous follow-up is always cancelled before a new one is scheduled
//! or before `skip` runs the follow-up itself, so each phase entry advances
//! at most once.
//!
//! Time is fed in through [`TransitionController::advance_to`]. Commands act
//! at the last instant the controller was advanced to.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use glitchroom_core::event::EventMetadata;
use tracing::{debug, info};

use super::events::{
    GameEvent, GameEventKind, MessageExpired, MessagePosted, MessagesCleared, ModuleCompleted,
    PhaseEntered,
};
use super::messages::{MessageId, MessageStore, MessageView};
use super::phase::{TransitionCause, TransitionState};
use super::script::GameScript;
use super::timers::{FiredTimer, TimerAction, TimerHandle, TimerRegistry};

/// Drives one game through its phases.
#[derive(Debug)]
pub struct TransitionController {
    script: Arc<GameScript>,
    phase: TransitionState,
    completed: BTreeSet<usize>,
    messages: MessageStore,
    timers: TimerRegistry<TimerAction>,
    follow_up: Option<TimerHandle>,
    pending_completion: Option<TimerHandle>,
    now: DateTime<Utc>,
    journal: Vec<GameEvent>,
}

impl TransitionController {
    /// Creates an idle controller whose logical time starts at `now`.
    #[must_use]
    pub fn new(script: Arc<GameScript>, now: DateTime<Utc>) -> Self {
        Self {
            script,
            phase: TransitionState::Idle,
            completed: BTreeSet::new(),
            messages: MessageStore::new(),
            timers: TimerRegistry::new(),
            follow_up: None,
            pending_completion: None,
            now,
            journal: Vec::new(),
        }
    }

    /// The active phase.
    #[must_use]
    pub fn current_phase(&self) -> TransitionState {
        self.phase
    }

    /// Whether `skip` would currently do anything.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        self.phase.is_skippable()
    }

    /// Indices of completed modules.
    #[must_use]
    pub fn completed(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    /// Whether `module` has been completed.
    #[must_use]
    pub fn is_completed(&self, module: usize) -> bool {
        self.completed.contains(&module)
    }

    /// Displayed messages, oldest first.
    #[must_use]
    pub fn visible_messages(&self) -> Vec<MessageView> {
        self.messages.visible()
    }

    /// The message store.
    #[must_use]
    pub fn messages(&self) -> &MessageStore {
        &self.messages
    }

    /// The script this game runs.
    #[must_use]
    pub fn script(&self) -> &GameScript {
        &self.script
    }

    /// Everything that has happened in this game, in order.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.journal
    }

    /// Number of outstanding timers of any kind.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Deadline of the outstanding phase follow-up, if any.
    #[must_use]
    pub fn follow_up_deadline(&self) -> Option<DateTime<Utc>> {
        self.follow_up
            .and_then(|handle| self.timers.deadline(handle))
    }

    /// The controller's logical time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Fires every timer due at or before `now`, earliest first, and moves
    /// logical time to `now`. Time never moves backwards. Returns how many
    /// timers fired.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> usize {
        let target = now.max(self.now);
        let mut fired_count = 0;
        while let Some(fired) = self.timers.pop_due(target) {
            self.now = fired.deadline.max(self.now);
            fired_count += 1;
            self.dispatch(fired);
        }
        self.now = target;
        fired_count
    }

    /// Starts the game. Only valid from `Idle`; otherwise a no-op.
    pub fn start(&mut self) -> bool {
        if self.phase != TransitionState::Idle {
            debug!(phase = self.phase.name(), "start ignored outside idle");
            return false;
        }
        self.enter(TransitionState::Welcoming, TransitionCause::Started);
        true
    }

    /// Cuts the current wait short: cancels the follow-up, clears the
    /// messages and runs the follow-up now. A no-op unless the phase is
    /// skippable.
    pub fn skip(&mut self) -> bool {
        if !self.phase.is_skippable() {
            debug!(phase = self.phase.name(), "skip ignored in non-skippable phase");
            return false;
        }
        self.cancel_follow_up();
        self.clear_messages();
        self.run_follow_up(TransitionCause::Skipped);
        true
    }

    /// Records that `module` was solved. Only valid while that module is
    /// active and not yet complete; otherwise a no-op.
    pub fn report_completion(&mut self, module: usize) -> bool {
        if self.phase != TransitionState::ModuleActive(module) {
            debug!(
                module,
                phase = self.phase.name(),
                "completion ignored for inactive module"
            );
            return false;
        }
        if !self.completed.insert(module) {
            debug!(module, "duplicate completion ignored");
            return false;
        }
        self.record(GameEventKind::ModuleCompleted(ModuleCompleted { module }));
        self.enter(
            TransitionState::Completing(module),
            TransitionCause::ModuleCompleted,
        );
        true
    }

    /// Reports `module` complete after `delay`. At most one deferred report
    /// is outstanding at a time; returns `false` if one already is.
    pub fn schedule_completion(&mut self, module: usize, delay: Duration) -> bool {
        if delay.is_zero() {
            return self.report_completion(module);
        }
        if self.pending_completion.is_some() {
            debug!(module, "deferred completion already scheduled");
            return false;
        }
        let handle = self
            .timers
            .schedule(self.now, delay, TimerAction::ReportCompletion(module));
        self.pending_completion = Some(handle);
        true
    }

    /// Posts a message that decays after `ttl`.
    pub fn post_message(&mut self, text: impl Into<String>, ttl: Duration) -> MessageId {
        let text = text.into();
        let message_id = self
            .messages
            .add(&mut self.timers, self.now, text.clone(), ttl);
        self.record(GameEventKind::MessagePosted(MessagePosted { message_id, text }));
        message_id
    }

    /// Removes a displayed message ahead of its decay.
    pub fn dismiss_message(&mut self, id: MessageId) -> bool {
        self.messages.remove(&mut self.timers, id)
    }

    fn dispatch(&mut self, fired: FiredTimer<TimerAction>) {
        match fired.action {
            TimerAction::ExpireMessage(message_id) => {
                if self.messages.expire(message_id) {
                    self.record(GameEventKind::MessageExpired(MessageExpired { message_id }));
                }
            }
            TimerAction::FollowUp(scheduled_in) => {
                if self.follow_up != Some(fired.handle) || self.phase != scheduled_in {
                    debug!(phase = self.phase.name(), "stale follow-up dropped");
                    return;
                }
                self.follow_up = None;
                self.run_follow_up(TransitionCause::Elapsed);
            }
            TimerAction::ReportCompletion(module) => {
                if self.pending_completion == Some(fired.handle) {
                    self.pending_completion = None;
                }
                debug!(module, "deferred completion fired");
                self.report_completion(module);
            }
        }
    }

    fn run_follow_up(&mut self, cause: TransitionCause) {
        let next = match self.phase {
            TransitionState::Welcoming => self.next_module_after(None),
            TransitionState::IntroducingModule(module) => TransitionState::ModuleActive(module),
            TransitionState::Completing(module) => self.next_module_after(Some(module)),
            TransitionState::Idle | TransitionState::ModuleActive(_) | TransitionState::AllDone => {
                return;
            }
        };
        self.enter(next, cause);
    }

    fn next_module_after(&self, module: Option<usize>) -> TransitionState {
        let first = module.map_or(0, |module| module + 1);
        (first..self.script.module_count())
            .find(|candidate| !self.completed.contains(candidate))
            .map_or(TransitionState::AllDone, TransitionState::IntroducingModule)
    }

    fn enter(&mut self, next: TransitionState, cause: TransitionCause) {
        self.cancel_follow_up();
        self.cancel_pending_completion();
        self.clear_messages();

        let from = std::mem::replace(&mut self.phase, next);
        info!(from = from.name(), to = next.name(), module = ?next.module_index(), ?cause, "phase transition");
        self.record(GameEventKind::PhaseEntered(PhaseEntered {
            from,
            to: next,
            cause,
        }));

        let timings = self.script.timings;
        let announcement = match next {
            TransitionState::Welcoming => {
                Some((self.script.welcome_text.clone(), timings.welcome_wait))
            }
            TransitionState::IntroducingModule(module) => self
                .script
                .module(module)
                .map(|descriptor| (descriptor.intro_text.clone(), timings.intro_wait)),
            TransitionState::Completing(module) => self
                .script
                .module(module)
                .map(|descriptor| (descriptor.completion_text.clone(), timings.completion_wait)),
            TransitionState::Idle | TransitionState::ModuleActive(_) | TransitionState::AllDone => {
                None
            }
        };

        if let Some((text, wait)) = announcement {
            self.post_message(text, wait);
        }
        if next.is_skippable() {
            let wait = match next {
                TransitionState::Welcoming => timings.welcome_wait,
                TransitionState::IntroducingModule(_) => timings.intro_wait,
                _ => timings.completion_wait,
            };
            self.schedule_follow_up(wait);
        }
    }

    fn schedule_follow_up(&mut self, wait: Duration) {
        self.cancel_follow_up();
        let handle = self
            .timers
            .schedule(self.now, wait, TimerAction::FollowUp(self.phase));
        self.follow_up = Some(handle);
    }

    fn cancel_follow_up(&mut self) {
        if let Some(handle) = self.follow_up.take() {
            self.timers.cancel(handle);
        }
    }

    fn cancel_pending_completion(&mut self) {
        if let Some(handle) = self.pending_completion.take() {
            self.timers.cancel(handle);
        }
    }

    fn clear_messages(&mut self) {
        let count = self.messages.clear(&mut self.timers);
        if count > 0 {
            self.record(GameEventKind::MessagesCleared(MessagesCleared { count }));
        }
    }

    fn record(&mut self, kind: GameEventKind) {
        let event = GameEvent {
            metadata: EventMetadata {
                event_type: kind.event_type().to_owned(),
                sequence_number: self.journal.len() as u64 + 1,
                occurred_at: self.now,
            },
            kind,
        };
        self.journal.push(event);
    }
}
