//! Command handlers
//!
//! Executes parsed commands against one session's `AuthService` and renders
//! the numeric reply sent back to the client.

use crate::auth::results::{StatusResult, UserSummary};
use crate::auth::{AuthService, ProfileUpdate};
use crate::error::AuthError;
use crate::error::handlers::{error_to_reply_code, handle_error};
use crate::protocol::responses::{self, format_multiline, format_response};
use crate::protocol::{Command, CommandResult, CommandStatus, ProfileField};

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `auth` - The session's auth workflow.
/// * `command` - Reference to the parsed command.
///
/// # Returns
///
/// * `CommandResult` - Status plus the reply to send.
pub fn handle_command(auth: &mut AuthService, command: &Command) -> CommandResult {
    match command {
        Command::REGISTER {
            username,
            password,
            confirm,
            email,
            name,
        } => handle_cmd_register(
            auth,
            username,
            password,
            confirm,
            email.as_deref(),
            name.as_deref(),
        ),
        Command::LOGIN { username, password } => handle_cmd_login(auth, username, password),
        Command::LOGOUT => handle_cmd_logout(auth),
        Command::STATUS => handle_cmd_status(auth),
        Command::USERS => handle_cmd_users(auth),
        Command::UPDATE(field) => handle_cmd_update(auth, field),
        Command::NOOP => CommandResult::success(format_response(responses::OK, "OK")),
        Command::QUIT => handle_cmd_quit(auth),
        Command::INVALID(usage) => CommandResult::failure(
            "Invalid arguments",
            format_response(responses::SYNTAX_ERROR, usage),
        ),
        Command::UNKNOWN => CommandResult::failure(
            "Unknown command",
            format_response(responses::UNKNOWN_COMMAND, "Unknown command"),
        ),
    }
}

fn handle_cmd_register(
    auth: &mut AuthService,
    username: &str,
    password: &str,
    confirm: &str,
    email: Option<&str>,
    name: Option<&str>,
) -> CommandResult {
    match auth.register(username, password, confirm, email, name) {
        Ok(_) => CommandResult::success(format_response(
            responses::ACTION_OK,
            "Registration successful! Please login.",
        )),
        Err(e) => error_result(&e),
    }
}

fn handle_cmd_login(auth: &mut AuthService, username: &str, password: &str) -> CommandResult {
    match auth.login(username, password) {
        Ok(result) => CommandResult::success(format_response(
            responses::LOGIN_SUCCESS,
            &format!("Welcome {}", result.username),
        )),
        Err(e) => error_result(&e),
    }
}

fn handle_cmd_logout(auth: &mut AuthService) -> CommandResult {
    let result = auth.logout();
    let message = if result.was_logged_in {
        "You have been logged out"
    } else {
        "Not logged in"
    };
    CommandResult::success(format_response(responses::LOGGED_OUT, message))
}

fn handle_cmd_status(auth: &AuthService) -> CommandResult {
    match auth.status() {
        Ok(status) => CommandResult::success(format_response(
            responses::SYSTEM_STATUS,
            &status_line(&status),
        )),
        Err(e) => error_result(&e),
    }
}

fn handle_cmd_users(auth: &AuthService) -> CommandResult {
    match auth.list_users() {
        Ok(users) => {
            let lines: Vec<String> = users.iter().map(user_line).collect();
            CommandResult::success(format_multiline(
                responses::USER_LIST,
                &format!("{} registered users", lines.len()),
                &lines,
                "End",
            ))
        }
        Err(e) => error_result(&e),
    }
}

fn handle_cmd_update(auth: &AuthService, field: &ProfileField) -> CommandResult {
    let update = match field {
        ProfileField::Name(name) => ProfileUpdate {
            name: Some(name.as_str()),
            ..Default::default()
        },
        ProfileField::Email(email) => ProfileUpdate {
            email: Some(email.as_str()),
            ..Default::default()
        },
        // Blank new password keeps the current one
        ProfileField::Password(password) if password.is_empty() => {
            return match auth.session().username() {
                Some(_) => {
                    CommandResult::success(format_response(responses::ACTION_OK, "Profile unchanged"))
                }
                None => error_result(&AuthError::NotLoggedIn),
            };
        }
        ProfileField::Password(password) => ProfileUpdate {
            new_password: Some(password.as_str()),
            ..Default::default()
        },
    };

    match auth.update_profile(update) {
        Ok(_) => CommandResult::success(format_response(
            responses::ACTION_OK,
            "Profile updated successfully",
        )),
        Err(e) => error_result(&e),
    }
}

/// Handles the QUIT command: logs out and signals connection close.
fn handle_cmd_quit(auth: &mut AuthService) -> CommandResult {
    auth.logout();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(responses::CLOSING, "Goodbye")),
    }
}

fn error_result(err: &AuthError) -> CommandResult {
    handle_error(err);
    CommandResult::failure(
        err.to_string(),
        format_response(error_to_reply_code(err), &err.to_string()),
    )
}

fn status_line(status: &StatusResult) -> String {
    match &status.current_username {
        Some(username) => format!(
            "Users: {}; logged in as {}",
            status.total_users, username
        ),
        None => format!("Users: {}; not logged in", status.total_users),
    }
}

fn user_line(user: &UserSummary) -> String {
    format!(
        "Username: {} | Name: {} | Email: {}",
        user.username,
        user.name.as_deref().unwrap_or("-"),
        user.email.as_deref().unwrap_or("-"),
    )
}
