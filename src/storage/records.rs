//! Stored record types

use chrono::{DateTime, Utc};

/// One registered user as held by a credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub username: String,
    /// Lower-case hex SHA-256 digest of the password
    pub password_hash: String,
    pub name: Option<String>,
    /// Trimmed, lower-cased email address
    pub email: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            name: None,
            email: None,
            created_at: None,
        }
    }

    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Replacement values for the mutable fields of a record.
///
/// `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl ProfilePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }

    pub fn apply(self, record: &mut UserRecord) {
        if let Some(name) = self.name {
            record.name = Some(name);
        }
        if let Some(email) = self.email {
            record.email = Some(email);
        }
        if let Some(hash) = self.password_hash {
            record.password_hash = hash;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_only_touches_supplied_fields() {
        let mut record = UserRecord::new("alice", "aa")
            .with_name(Some("Alice".into()))
            .with_email(Some("alice@example.com".into()));

        ProfilePatch {
            email: Some("alice@school.edu".into()),
            ..Default::default()
        }
        .apply(&mut record);

        assert_eq!(record.name.as_deref(), Some("Alice"));
        assert_eq!(record.email.as_deref(), Some("alice@school.edu"));
        assert_eq!(record.password_hash, "aa");
    }

    #[test]
    fn default_patch_is_empty() {
        assert!(ProfilePatch::default().is_empty());
        assert!(
            !ProfilePatch {
                password_hash: Some("bb".into()),
                ..Default::default()
            }
            .is_empty()
        );
    }
}
