//! Registration and login workflow
//!
//! `AuthService` owns one session's `SessionFlag` and a shared handle to the
//! credential store. Every session of the command server gets its own
//! service; all of them share the same store.

use super::credentials::{hash_password, verify_password};
use super::results::{LoginResult, LogoutResult, RegisterResult, StatusResult, UserSummary};
use super::session::SessionFlag;
use super::validator;
use crate::config::AuthPolicy;
use crate::error::AuthError;
use crate::storage::{CredentialStore, ProfilePatch, UserRecord};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

/// Requested profile changes. `None` leaves a field unchanged, and so does an
/// empty `new_password`.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub new_password: Option<&'a str>,
}

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    policy: AuthPolicy,
    session: SessionFlag,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, policy: AuthPolicy) -> Self {
        Self {
            store,
            policy,
            session: SessionFlag::new(),
        }
    }

    pub fn session(&self) -> &SessionFlag {
        &self.session
    }

    /// Registers a new user with an optional email and display name.
    ///
    /// Username and email uniqueness are pre-checked here for a clear error
    /// and enforced again by the store's `put`.
    pub fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<RegisterResult, AuthError> {
        let fields = validator::validate_registration(
            username,
            password,
            confirm_password,
            email,
            name,
            &self.policy,
        )?;

        if self.store.get(username)?.is_some() {
            return Err(AuthError::DuplicateUsername(username.to_string()));
        }
        if let Some(email) = fields.email.as_deref() {
            if self.store.find_by_email(email)?.is_some() {
                return Err(AuthError::DuplicateUsername(username.to_string()));
            }
        }

        let record = UserRecord::new(username, hash_password(password))
            .with_email(fields.email)
            .with_name(fields.name)
            .with_created_at(Utc::now());
        self.store.put(record)?;

        info!("Registered user {}", username);
        Ok(RegisterResult {
            username: username.to_string(),
        })
    }

    /// Authenticates and marks the session logged in.
    ///
    /// Unknown usernames and wrong passwords fail identically, and a failure
    /// never touches the session flag.
    pub fn login(&mut self, username: &str, password: &str) -> Result<LoginResult, AuthError> {
        let authenticated = match self.store.get(username)? {
            Some(record) => verify_password(password, &record.password_hash),
            None => {
                // Hash anyway so unknown users cost the same as known ones
                std::hint::black_box(hash_password(password));
                false
            }
        };

        if !authenticated {
            warn!("Failed login attempt for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        self.session.set_logged_in(username);
        info!("User {} logged in", username);
        Ok(LoginResult {
            username: username.to_string(),
        })
    }

    /// Clears the session flag. Safe to call when already logged out.
    pub fn logout(&mut self) -> LogoutResult {
        if let Some(username) = self.session.username() {
            info!("User {} logged out", username);
        }
        LogoutResult {
            was_logged_in: self.session.clear(),
        }
    }

    pub fn status(&self) -> Result<StatusResult, AuthError> {
        Ok(StatusResult {
            total_users: self.store.count()?,
            current_username: self.session.username().map(str::to_string),
        })
    }

    /// Lists registered users. Requires a logged-in session.
    pub fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        self.require_login()?;
        let users = self.store.list()?;
        debug!("Listing {} users", users.len());
        Ok(users.into_iter().map(UserSummary::from).collect())
    }

    /// Updates the logged-in user's name, email or password.
    pub fn update_profile(&self, update: ProfileUpdate<'_>) -> Result<UserSummary, AuthError> {
        let username = self.require_login()?;

        let name = update.name.map(validator::validate_name).transpose()?;
        let email = update
            .email
            .map(|email| validator::validate_email(Some(email), true))
            .transpose()?
            .flatten();
        let password_hash = match update.new_password.filter(|password| !password.is_empty()) {
            Some(password) => {
                validator::validate_password(password, &self.policy)?;
                Some(hash_password(password))
            }
            None => None,
        };

        let patch = ProfilePatch {
            name,
            email,
            password_hash,
        };
        if patch.is_empty() {
            return Err(AuthError::Validation("Nothing to update".into()));
        }

        let record = self.store.update(username, patch)?;
        info!("Updated profile for {}", username);
        Ok(record.into())
    }

    fn require_login(&self) -> Result<&str, AuthError> {
        self.session.username().ok_or(AuthError::NotLoggedIn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), AuthPolicy::default())
    }

    #[test]
    fn register_then_login_sets_session() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();

        let result = auth.login("alice", "secret1").unwrap();
        assert_eq!(result.username, "alice");
        assert!(auth.session().is_logged_in());
        assert_eq!(auth.session().current_username(), "alice");
    }

    #[test]
    fn wrong_password_then_right_password() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();

        let err = auth.login("alice", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!auth.session().is_logged_in());

        auth.login("alice", "secret1").unwrap();
        assert_eq!(auth.session().current_username(), "alice");
    }

    #[test]
    fn second_registration_is_duplicate_regardless_of_password() {
        let auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();

        let err = auth.register("alice", "other", "other", None, None).unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(u) if u == "alice"));
    }

    #[test]
    fn duplicate_email_is_rejected_as_duplicate() {
        let auth = service();
        auth.register("alice", "secret1", "secret1", Some("alice@example.com"), None)
            .unwrap();

        let err = auth
            .register("alice2", "secret1", "secret1", Some("ALICE@example.com"), None)
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername(_)));
    }

    #[test]
    fn validation_failures_do_not_touch_the_store() {
        let auth = service();
        assert!(matches!(
            auth.register("alice", "secret1", "secret2", None, None),
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            auth.register("alice", "secret1", "secret1", Some("bad-email"), None),
            Err(AuthError::Validation(_))
        ));
        assert_eq!(auth.status().unwrap().total_users, 0);
    }

    #[test]
    fn stored_hash_is_unsalted_sha256() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        let auth = AuthService::new(Arc::clone(&store), AuthPolicy::default());
        auth.register("alice", "abc", "abc", None, None).unwrap();

        let record = store.get("alice").unwrap().unwrap();
        assert_eq!(
            record.password_hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(record.created_at.is_some());
    }

    #[test]
    fn registration_stores_optional_name() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        let auth = AuthService::new(Arc::clone(&store), AuthPolicy::default());
        auth.register(
            "alice",
            "secret1",
            "secret1",
            Some("alice@example.com"),
            Some("Alice Liddell"),
        )
        .unwrap();
        auth.register("bob", "hunter2", "hunter2", None, None).unwrap();

        let alice = store.get("alice").unwrap().unwrap();
        assert_eq!(alice.name.as_deref(), Some("Alice Liddell"));
        assert!(store.get("bob").unwrap().unwrap().name.is_none());
    }

    #[test]
    fn strict_policy_requires_every_field() {
        let strict = AuthPolicy {
            require_email: true,
            require_name: true,
            ..AuthPolicy::default()
        };
        let auth = AuthService::new(Arc::new(MemoryStore::new()), strict);

        assert!(matches!(
            auth.register("alice", "secret1", "secret1", None, Some("Alice")),
            Err(AuthError::Validation(msg)) if msg == "Email is required"
        ));
        assert!(matches!(
            auth.register("alice", "secret1", "secret1", Some("alice@example.com"), None),
            Err(AuthError::Validation(msg)) if msg == "Name is required"
        ));
        assert_eq!(auth.status().unwrap().total_users, 0);

        auth.register(
            "alice",
            "secret1",
            "secret1",
            Some("alice@example.com"),
            Some("Alice"),
        )
        .unwrap();
        assert_eq!(auth.status().unwrap().total_users, 1);
    }

    #[test]
    fn unknown_user_and_wrong_password_fail_identically() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();

        let unknown = auth.login("nobody", "secret1").unwrap_err();
        let wrong = auth.login("alice", "nope").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn failed_login_keeps_existing_session() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        auth.register("bob", "hunter2", "hunter2", None, None).unwrap();
        auth.login("alice", "secret1").unwrap();

        assert!(auth.login("bob", "wrong").is_err());
        assert_eq!(auth.session().current_username(), "alice");
    }

    #[test]
    fn logout_is_idempotent() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        auth.login("alice", "secret1").unwrap();

        assert!(auth.logout().was_logged_in);
        assert!(!auth.session().is_logged_in());
        assert_eq!(auth.session().current_username(), "");
        assert!(!auth.logout().was_logged_in);
    }

    #[test]
    fn listing_requires_login() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        assert!(matches!(auth.list_users(), Err(AuthError::NotLoggedIn)));

        auth.login("alice", "secret1").unwrap();
        let users = auth.list_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "alice");
    }

    #[test]
    fn status_reports_count_and_session() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        auth.register("bob", "hunter2", "hunter2", None, None).unwrap();

        let status = auth.status().unwrap();
        assert_eq!(status.total_users, 2);
        assert!(status.current_username.is_none());

        auth.login("bob", "hunter2").unwrap();
        assert_eq!(auth.status().unwrap().current_username.as_deref(), Some("bob"));
    }

    #[test]
    fn profile_update_changes_password_and_email() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        assert!(matches!(
            auth.update_profile(ProfileUpdate::default()),
            Err(AuthError::NotLoggedIn)
        ));

        auth.login("alice", "secret1").unwrap();
        let summary = auth
            .update_profile(ProfileUpdate {
                name: Some("Alice Liddell"),
                email: Some("alice@school.edu"),
                new_password: Some("newpass"),
            })
            .unwrap();
        assert_eq!(summary.name.as_deref(), Some("Alice Liddell"));
        assert_eq!(summary.email.as_deref(), Some("alice@school.edu"));

        auth.logout();
        assert!(auth.login("alice", "secret1").is_err());
        auth.login("alice", "newpass").unwrap();
    }

    #[test]
    fn empty_new_password_keeps_current_hash() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        auth.login("alice", "secret1").unwrap();

        auth.update_profile(ProfileUpdate {
            email: Some("alice@school.edu"),
            new_password: Some(""),
            ..Default::default()
        })
        .unwrap();

        auth.logout();
        auth.login("alice", "secret1").unwrap();
    }

    #[test]
    fn profile_update_rejects_bad_email() {
        let mut auth = service();
        auth.register("alice", "secret1", "secret1", None, None).unwrap();
        auth.login("alice", "secret1").unwrap();

        assert!(matches!(
            auth.update_profile(ProfileUpdate {
                email: Some("nope"),
                ..Default::default()
            }),
            Err(AuthError::Validation(_))
        ));
    }

    #[test]
    fn workflow_behaves_the_same_on_sqlite() {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        let mut auth = AuthService::new(store, AuthPolicy::default());

        auth.register("alice", "secret1", "secret1", Some("alice@example.com"), None)
            .unwrap();
        assert!(matches!(
            auth.register("alice", "x", "x", None, None),
            Err(AuthError::DuplicateUsername(_))
        ));
        assert!(matches!(
            auth.login("alice", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        auth.login("alice", "secret1").unwrap();
        assert_eq!(auth.session().current_username(), "alice");
    }

    #[test]
    fn sessions_share_one_store() {
        let store: Arc<dyn CredentialStore> = Arc::new(MemoryStore::new());
        let first = AuthService::new(Arc::clone(&store), AuthPolicy::default());
        let mut second = AuthService::new(store, AuthPolicy::default());

        first.register("alice", "secret1", "secret1", None, None).unwrap();
        second.login("alice", "secret1").unwrap();

        assert!(second.session().is_logged_in());
        assert!(!first.session().is_logged_in());
    }
}
