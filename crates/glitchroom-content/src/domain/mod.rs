//! Script document model and validation.

pub mod document;
pub mod error;
