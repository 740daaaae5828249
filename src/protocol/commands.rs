//! Module `commands`
//!
//! Defines the commands accepted on the control connection, their execution
//! status and result.

use std::fmt;

/// Represents a command parsed from one client line.
///
/// Commands that carry arguments store them as owned strings.
#[derive(PartialEq)]
pub enum Command {
    REGISTER {
        username: String,
        password: String,
        confirm: String,
        email: Option<String>,
        name: Option<String>,
    },
    LOGIN {
        username: String,
        password: String,
    },
    LOGOUT,
    STATUS,
    USERS,
    UPDATE(ProfileField),
    NOOP,
    QUIT,
    INVALID(String), // Known command with bad arguments; holds the usage line
    UNKNOWN,
}

/// Field targeted by an UPDATE command.
#[derive(PartialEq)]
pub enum ProfileField {
    Name(String),
    Email(String),
    Password(String), // Empty keeps the current password
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

impl Command {
    /// Command keyword, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            Command::REGISTER { .. } => "REGISTER",
            Command::LOGIN { .. } => "LOGIN",
            Command::LOGOUT => "LOGOUT",
            Command::STATUS => "STATUS",
            Command::USERS => "USERS",
            Command::UPDATE(_) => "UPDATE",
            Command::NOOP => "NOOP",
            Command::QUIT => "QUIT",
            Command::INVALID(_) => "INVALID",
            Command::UNKNOWN => "UNKNOWN",
        }
    }
}

// Passwords never reach log output
impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::REGISTER {
                username,
                email,
                name,
                ..
            } => f
                .debug_struct("REGISTER")
                .field("username", username)
                .field("email", email)
                .field("name", name)
                .finish_non_exhaustive(),
            Command::LOGIN { username, .. } => f
                .debug_struct("LOGIN")
                .field("username", username)
                .finish_non_exhaustive(),
            Command::UPDATE(field) => f.debug_tuple("UPDATE").field(field).finish(),
            Command::INVALID(usage) => f.debug_tuple("INVALID").field(usage).finish(),
            other => f.write_str(other.name()),
        }
    }
}

impl fmt::Debug for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileField::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ProfileField::Email(email) => f.debug_tuple("Email").field(email).finish(),
            ProfileField::Password(_) => f.write_str("Password(..)"),
        }
    }
}

impl CommandResult {
    pub fn success(message: String) -> Self {
        Self {
            status: CommandStatus::Success,
            message: Some(message),
        }
    }

    pub fn failure(reason: impl Into<String>, message: String) -> Self {
        Self {
            status: CommandStatus::Failure(reason.into()),
            message: Some(message),
        }
    }
}
