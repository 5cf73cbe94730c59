//! Glitchroom — transition and timed-message orchestration.
//!
//! Sequences a game through welcome, per-module intro, active module and
//! completion phases; owns the expiring message queue and the registry of
//! pending timers; hosts the challenge modules.

pub mod application;
pub mod domain;
