//! Domain model: phases, messages, timers, the script and the controller.

pub mod commands;
pub mod controller;
pub mod events;
pub mod messages;
pub mod phase;
pub mod script;
pub mod timers;
