//! Session login state
//!
//! One `SessionFlag` per session; nothing global.

/// Minimal login state: a boolean plus the logged-in username.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionFlag {
    is_logged_in: bool,
    current_username: String,
}

impl SessionFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `username` as logged in, replacing any previous user.
    pub fn set_logged_in(&mut self, username: &str) {
        self.is_logged_in = true;
        self.current_username = username.to_string();
    }

    /// Clears the flag. Returns whether a user was logged in.
    pub fn clear(&mut self) -> bool {
        let was_logged_in = self.is_logged_in;
        self.is_logged_in = false;
        self.current_username.clear();
        was_logged_in
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    /// Empty when logged out.
    pub fn current_username(&self) -> &str {
        &self.current_username
    }

    pub fn username(&self) -> Option<&str> {
        self.is_logged_in.then_some(self.current_username.as_str())
    }
}
