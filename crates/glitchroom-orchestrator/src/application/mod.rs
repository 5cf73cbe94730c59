//! Application layer: module hosting, game sessions, command and query
//! handlers.

pub mod command_handlers;
pub mod module_host;
pub mod query_handlers;
pub mod session;
