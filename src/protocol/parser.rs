//! Command parsing
//!
//! Turns one raw client line into a `Command`.

use crate::protocol::{Command, ProfileField};

const REGISTER_USAGE: &str =
    "Usage: REGISTER <username> <password> <confirm> [email|-] [name]";
const LOGIN_USAGE: &str = "Usage: LOGIN <username> <password>";
const UPDATE_USAGE: &str = "Usage: UPDATE NAME <name> | EMAIL <email> | PASSWORD [new]";

/// Parses a raw command line received from a client.
///
/// The keyword is case-insensitive; arguments are whitespace separated and
/// kept verbatim. A known keyword with the wrong arguments yields `INVALID`.
///
/// REGISTER takes everything after the email as the display name; `-` in the
/// email position registers a name without an email.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let arg = parts.next().unwrap_or("").trim();
    let args: Vec<&str> = arg.split_whitespace().collect();

    match cmd.as_str() {
        "REGISTER" => match args.as_slice() {
            [username, password, confirm, rest @ ..] => {
                let email = rest.first().copied().filter(|email| *email != "-");
                let name = rest
                    .get(1..)
                    .map(|words| words.join(" "))
                    .filter(|name| !name.is_empty());
                register(username, password, confirm, email, name)
            }
            _ => Command::INVALID(REGISTER_USAGE.into()),
        },
        "LOGIN" => match args.as_slice() {
            [username, password] => Command::LOGIN {
                username: username.to_string(),
                password: password.to_string(),
            },
            _ => Command::INVALID(LOGIN_USAGE.into()),
        },
        "LOGOUT" => Command::LOGOUT,
        "STATUS" => Command::STATUS,
        "USERS" => Command::USERS,
        "UPDATE" => parse_update(arg),
        "NOOP" => Command::NOOP,
        "QUIT" | "Q" => Command::QUIT,
        _ => Command::UNKNOWN,
    }
}

fn register(
    username: &str,
    password: &str,
    confirm: &str,
    email: Option<&str>,
    name: Option<String>,
) -> Command {
    Command::REGISTER {
        username: username.to_string(),
        password: password.to_string(),
        confirm: confirm.to_string(),
        email: email.map(str::to_string),
        name,
    }
}

fn parse_update(arg: &str) -> Command {
    let mut parts = arg.splitn(2, char::is_whitespace);
    let field = parts.next().unwrap_or("").to_ascii_uppercase();
    let value = parts.next().unwrap_or("").trim();

    match field.as_str() {
        "NAME" if !value.is_empty() => Command::UPDATE(ProfileField::Name(value.to_string())),
        "EMAIL" if !value.is_empty() && !value.contains(char::is_whitespace) => {
            Command::UPDATE(ProfileField::Email(value.to_string()))
        }
        "PASSWORD" if !value.contains(char::is_whitespace) => {
            Command::UPDATE(ProfileField::Password(value.to_string()))
        }
        _ => Command::INVALID(UPDATE_USAGE.into()),
    }
}
