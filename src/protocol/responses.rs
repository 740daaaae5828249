//! Response handling
//!
//! Defines numeric reply codes and line formatting.

pub const OK: u16 = 200;
pub const SYSTEM_STATUS: u16 = 211;
pub const USER_LIST: u16 = 212;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const LOGIN_SUCCESS: u16 = 230;
pub const LOGGED_OUT: u16 = 231;
pub const ACTION_OK: u16 = 250;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const NOT_LOGGED_IN: u16 = 530;
pub const ACTION_NOT_TAKEN: u16 = 550;

/// Format a single-line reply
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}

/// Format a multi-line reply: `code-header`, body lines, then `code footer`
pub fn format_multiline(code: u16, header: &str, lines: &[String], footer: &str) -> String {
    let mut reply = format!("{}-{}\r\n", code, header);
    for line in lines {
        reply.push(' ');
        reply.push_str(line);
        reply.push_str("\r\n");
    }
    reply.push_str(&format_response(code, footer));
    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiline_reply_ends_with_final_code_line() {
        let reply = format_multiline(USER_LIST, "Users", &["alice".into(), "bob".into()], "End");
        assert_eq!(reply, "212-Users\r\n alice\r\n bob\r\n212 End\r\n");
    }
}
