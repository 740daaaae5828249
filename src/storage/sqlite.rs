//! SQLite-backed credential store.
//!
//! Table:
//! - `users`: id, name, email, username (UNIQUE), password, created_at
//!
//! The `UNIQUE` constraint on `username` is the source of truth for username
//! uniqueness; email uniqueness is checked under the connection lock.

use super::{CredentialStore, ProfilePatch, UserRecord};
use crate::error::StorageError;
use chrono::DateTime;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const USER_COLUMNS: &str = "username, password, name, email, created_at";

/// Persistent store over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        // WAL mode for crash safety; ignored by in-memory databases
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        Self::init(conn)
    }

    /// Private database that disappears with the store.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT,
                email TEXT,
                username TEXT NOT NULL UNIQUE,
                password TEXT NOT NULL,
                created_at INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CredentialStore for SqliteStore {
    fn put(&self, record: UserRecord) -> Result<(), StorageError> {
        let conn = self.conn.lock();

        if let Some(email) = record.email.as_deref() {
            if email_owner(&conn, email)?.is_some() {
                return Err(StorageError::DuplicateEmail(record.username));
            }
        }

        let result = conn.execute(
            "INSERT INTO users (name, email, username, password, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.name,
                record.email,
                record.username,
                record.password_hash,
                record.created_at.map(|at| at.timestamp()),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::DuplicateUsername(record.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, username: &str) -> Result<Option<UserRecord>, StorageError> {
        let conn = self.conn.lock();
        Ok(select_user(&conn, username)?)
    }

    fn update(&self, username: &str, patch: ProfilePatch) -> Result<UserRecord, StorageError> {
        let conn = self.conn.lock();

        let mut record = select_user(&conn, username)?
            .ok_or_else(|| StorageError::NotFound(username.to_string()))?;

        if let Some(email) = patch.email.as_deref() {
            if let Some(owner) = email_owner(&conn, email)? {
                if owner != username {
                    return Err(StorageError::DuplicateEmail(username.to_string()));
                }
            }
        }

        patch.apply(&mut record);
        conn.execute(
            "UPDATE users SET name = ?1, email = ?2, password = ?3 WHERE username = ?4",
            params![record.name, record.email, record.password_hash, username],
        )?;

        Ok(record)
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock();
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(usize::try_from(total).unwrap_or_default())
    }

    fn list(&self) -> Result<Vec<UserRecord>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let conn = self.conn.lock();
        let record = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

fn select_user(conn: &Connection, username: &str) -> rusqlite::Result<Option<UserRecord>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
        params![username],
        row_to_record,
    )
    .optional()
}

fn email_owner(conn: &Connection, email: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT username FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
    .optional()
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecord> {
    let created_at: Option<i64> = row.get(4)?;
    Ok(UserRecord {
        username: row.get(0)?,
        password_hash: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        created_at: created_at.and_then(|secs| DateTime::from_timestamp(secs, 0)),
    })
}
