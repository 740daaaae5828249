//! Input validation for registration and profile updates
//!
//! All checks run before the credential store is touched.

use crate::config::AuthPolicy;
use crate::error::AuthError;
use regex::Regex;
use std::sync::LazyLock;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
const MAX_EMAIL_LENGTH: usize = 254;
const MAX_NAME_LENGTH: usize = 100;

static EMAIL_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(EMAIL_PATTERN).ok());

/// Rejects empty input and control characters that would break a command line.
///
/// `max_length` counts characters, not bytes.
fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.is_empty()
        && input.chars().count() <= max_length
        && !input.contains(['\r', '\n', '\0'])
}

/// Normalize an email for storage and uniqueness checks.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic `local@domain.tld` check on already-normalized input.
pub fn valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LENGTH
        && EMAIL_REGEX
            .as_ref()
            .is_some_and(|regex| regex.is_match(email))
}

pub fn validate_username(username: &str, policy: &AuthPolicy) -> Result<(), AuthError> {
    if username.trim().is_empty() {
        return Err(AuthError::Validation("Username cannot be empty".into()));
    }

    if username.chars().any(char::is_whitespace) {
        return Err(AuthError::Validation(
            "Username cannot contain whitespace".into(),
        ));
    }

    if !is_valid_input(username, policy.max_username_length) {
        return Err(AuthError::Validation(format!(
            "Username must be at most {} characters",
            policy.max_username_length
        )));
    }

    if username.chars().count() < policy.min_username_length {
        return Err(AuthError::Validation(format!(
            "Username must be at least {} characters",
            policy.min_username_length
        )));
    }

    Ok(())
}

pub fn validate_password(password: &str, policy: &AuthPolicy) -> Result<(), AuthError> {
    if password.is_empty() {
        return Err(AuthError::Validation("Password cannot be empty".into()));
    }

    if !is_valid_input(password, policy.max_password_length) {
        return Err(AuthError::Validation("Invalid password format".into()));
    }

    Ok(())
}

/// Validates an optional email and returns its normalized form.
///
/// An empty or whitespace-only value counts as absent.
pub fn validate_email(email: Option<&str>, required: bool) -> Result<Option<String>, AuthError> {
    let email = email.map(normalize_email).filter(|email| !email.is_empty());

    match email {
        Some(email) if valid_email(&email) => Ok(Some(email)),
        Some(_) => Err(AuthError::Validation("Invalid email address".into())),
        None if required => Err(AuthError::Validation("Email is required".into())),
        None => Ok(None),
    }
}

pub fn validate_name(name: &str) -> Result<String, AuthError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AuthError::Validation("Name cannot be empty".into()));
    }
    if !is_valid_input(name, MAX_NAME_LENGTH) {
        return Err(AuthError::Validation("Invalid name format".into()));
    }
    Ok(name.to_string())
}

/// Validates an optional display name. Blank counts as absent.
pub fn validate_optional_name(
    name: Option<&str>,
    required: bool,
) -> Result<Option<String>, AuthError> {
    match name.filter(|name| !name.trim().is_empty()) {
        Some(name) => validate_name(name).map(Some),
        None if required => Err(AuthError::Validation("Name is required".into())),
        None => Ok(None),
    }
}

/// Optional registration fields after normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationFields {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Full registration check: field rules plus password confirmation.
pub fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
    email: Option<&str>,
    name: Option<&str>,
    policy: &AuthPolicy,
) -> Result<RegistrationFields, AuthError> {
    validate_username(username, policy)?;
    validate_password(password, policy)?;

    if password != confirm_password {
        return Err(AuthError::Validation("Passwords do not match".into()));
    }

    Ok(RegistrationFields {
        email: validate_email(email, policy.require_email)?,
        name: validate_optional_name(name, policy.require_name)?,
    })
}
