//! In-memory credential store
//!
//! Holds records for the lifetime of the process only.

use super::{CredentialStore, ProfilePatch, UserRecord};
use crate::error::StorageError;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    // Registration order for `list`
    order: Vec<String>,
}

impl Inner {
    fn email_owner(&self, email: &str) -> Option<&UserRecord> {
        self.users
            .values()
            .find(|record| record.email.as_deref() == Some(email))
    }
}

/// Lock-protected map of username to record.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn put(&self, record: UserRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.write();

        if inner.users.contains_key(&record.username) {
            return Err(StorageError::DuplicateUsername(record.username));
        }
        if let Some(email) = record.email.as_deref() {
            if inner.email_owner(email).is_some() {
                return Err(StorageError::DuplicateEmail(record.username));
            }
        }

        inner.order.push(record.username.clone());
        inner.users.insert(record.username.clone(), record);
        Ok(())
    }

    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.inner.read().users.get(username).cloned())
    }

    fn update(&self, username: &str, patch: ProfilePatch) -> Result<UserRecord, StorageError> {
        let mut inner = self.inner.write();

        if !inner.users.contains_key(username) {
            return Err(StorageError::NotFound(username.to_string()));
        }
        if let Some(email) = patch.email.as_deref() {
            if let Some(owner) = inner.email_owner(email) {
                if owner.username != username {
                    return Err(StorageError::DuplicateEmail(username.to_string()));
                }
            }
        }

        let record = inner
            .users
            .get_mut(username)
            .ok_or_else(|| StorageError::NotFound(username.to_string()))?;
        patch.apply(record);
        Ok(record.clone())
    }

    fn count(&self) -> Result<usize, StorageError> {
        Ok(self.inner.read().users.len())
    }

    fn list(&self) -> Result<Vec<UserRecord>, StorageError> {
        let inner = self.inner.read();
        Ok(inner
            .order
            .iter()
            .filter_map(|username| inner.users.get(username).cloned())
            .collect())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.inner.read().email_owner(email).cloned())
    }
}
