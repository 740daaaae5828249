//! Error handlers
//!
//! Maps workflow errors to protocol reply codes and logs them.

use crate::error::types::AuthError;
use crate::protocol::responses;
use log::{error, warn};

/// Log a workflow error at a level matching its severity
pub fn handle_error(err: &AuthError) {
    match err {
        AuthError::Storage(_) => error!("Auth service error: {}", err),
        _ => warn!("Request rejected: {}", err),
    }
}

/// Convert error to a protocol reply code
pub fn error_to_reply_code(err: &AuthError) -> u16 {
    match err {
        AuthError::Validation(_) => responses::SYNTAX_ERROR,
        AuthError::DuplicateUsername(_) => responses::ACTION_NOT_TAKEN,
        AuthError::NotFound(_) => responses::ACTION_NOT_TAKEN,
        AuthError::InvalidCredentials => responses::NOT_LOGGED_IN,
        AuthError::NotLoggedIn => responses::NOT_LOGGED_IN,
        AuthError::Storage(_) => responses::LOCAL_ERROR,
    }
}
