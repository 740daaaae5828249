//! Credential storage
//!
//! Defines the `CredentialStore` contract the auth workflow depends on and its
//! two interchangeable backends: an in-process map and a SQLite table.

pub mod memory;
pub mod records;
pub mod sqlite;

pub use memory::MemoryStore;
pub use records::{ProfilePatch, UserRecord};
pub use sqlite::SqliteStore;

use crate::config::{StorageBackend, StorageSettings};
use crate::error::StorageError;
use log::info;
use std::sync::Arc;

/// Username-keyed user records with a uniqueness guarantee.
///
/// Implementations are shared between sessions, so `put` and `update` must
/// check and write under one critical section: no two records may share a
/// username, and no two records may share a (normalized) email.
pub trait CredentialStore: Send + Sync {
    /// Inserts a new record, failing if the username or email is taken.
    fn put(&self, record: UserRecord) -> Result<(), StorageError>;

    /// Returns the record for `username`, or `None` when absent.
    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Applies `patch` to an existing record and returns the updated record.
    fn update(&self, username: &str, patch: ProfilePatch) -> Result<UserRecord, StorageError>;

    /// Number of stored records.
    fn count(&self) -> Result<usize, StorageError>;

    /// All records in registration order.
    fn list(&self) -> Result<Vec<UserRecord>, StorageError>;

    /// Returns the record owning `email`, if any.
    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;
}

/// Opens the backend selected by configuration.
pub fn open_store(settings: &StorageSettings) -> Result<Arc<dyn CredentialStore>, StorageError> {
    match settings.backend {
        StorageBackend::Memory => {
            info!("Using in-memory credential store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let path = settings.database_path();
            info!("Using SQLite credential store at {}", path.display());
            Ok(Arc::new(SqliteStore::open(&path)?))
        }
    }
}
