//! Error types
//!
//! Defines domain-specific error types for each layer of the service.

use std::fmt;
use std::io;

/// Credential store errors
#[derive(Debug)]
pub enum StorageError {
    DuplicateUsername(String),
    DuplicateEmail(String),
    NotFound(String),
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DuplicateUsername(u) => write!(f, "Username already exists: {}", u),
            StorageError::DuplicateEmail(e) => write!(f, "Email already registered: {}", e),
            StorageError::NotFound(u) => write!(f, "User not found: {}", u),
            StorageError::Backend(msg) => write!(f, "Storage backend failure: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(error: rusqlite::Error) -> Self {
        StorageError::Backend(error.to_string())
    }
}

/// Authentication workflow errors
#[derive(Debug)]
pub enum AuthError {
    Validation(String),
    DuplicateUsername(String),
    NotFound(String),
    InvalidCredentials,
    NotLoggedIn,
    Storage(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Validation(msg) => write!(f, "{}", msg),
            AuthError::DuplicateUsername(u) => write!(f, "Username already exists: {}", u),
            AuthError::NotFound(u) => write!(f, "User not found: {}", u),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::NotLoggedIn => write!(f, "Please login first"),
            AuthError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

// A duplicate email is reported the same way as a duplicate username: the
// caller only learns that the account already exists.
impl From<StorageError> for AuthError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::DuplicateUsername(u) => AuthError::DuplicateUsername(u),
            StorageError::DuplicateEmail(u) => AuthError::DuplicateUsername(u),
            StorageError::NotFound(u) => AuthError::NotFound(u),
            StorageError::Backend(msg) => AuthError::Storage(msg),
        }
    }
}

/// Top-level service error
#[derive(Debug)]
pub enum ServerError {
    Storage(StorageError),
    Config(config::ConfigError),
    IoError(io::Error),
    TooManyClients(usize),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Storage(e) => write!(f, "Storage error: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::IoError(e) => write!(f, "I/O error: {}", e),
            ServerError::TooManyClients(max) => write!(f, "Too many clients (max {})", max),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<StorageError> for ServerError {
    fn from(error: StorageError) -> Self {
        ServerError::Storage(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::IoError(error)
    }
}
