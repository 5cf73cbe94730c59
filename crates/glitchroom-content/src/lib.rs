//! Glitchroom — game script content.
//!
//! Loads the YAML game script, validates it, and stamps it with a content
//! hash so a running game can report which script version it plays.

pub mod application;
pub mod domain;

pub use application::loader::{default_script, load_script, load_script_file};
