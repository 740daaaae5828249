//! Authentication result types
//!
//! Defines result structures returned by workflow operations.

use crate::storage::UserRecord;
use chrono::{DateTime, Utc};

/// Result of a successful registration
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub username: String,
}

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub username: String,
}

/// Result of a logout
#[derive(Debug, Clone)]
pub struct LogoutResult {
    pub was_logged_in: bool,
}

/// Store size plus the caller's session state
#[derive(Debug, Clone)]
pub struct StatusResult {
    pub total_users: usize,
    pub current_username: Option<String>,
}

/// Public view of a user record, without the password hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<UserRecord> for UserSummary {
    fn from(record: UserRecord) -> Self {
        Self {
            username: record.username,
            name: record.name,
            email: record.email,
            created_at: record.created_at,
        }
    }
}
