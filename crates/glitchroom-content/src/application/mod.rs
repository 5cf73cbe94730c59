//! Script loading.

pub mod loader;
