//! Glitchroom Core — shared domain abstractions.
//!
//! This crate defines the traits and types that the orchestrator, the
//! challenge modules and the API all depend on. It contains no
//! infrastructure code.

pub mod capability;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
