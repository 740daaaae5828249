//! Command protocol
//!
//! Handles command parsing, dispatch, and reply generation for the line
//! oriented control connection.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, ProfileField};
pub use handlers::handle_command;
pub use parser::parse_command;
