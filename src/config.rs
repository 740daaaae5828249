//! Configuration management for the student records auth service
//!
//! Layers built-in defaults, an optional `config.toml` and `STUDENT_AUTH_*`
//! environment overrides (nested keys separated by `__`, e.g.
//! `STUDENT_AUTH_SERVER__PORT=4000`).

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config";
const ENV_PREFIX: &str = "STUDENT_AUTH";

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthPolicy,
}

/// Network settings for the command listener
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// IP address to bind the command listener
    pub bind_address: String,

    /// Port for the command listener, must be non-zero
    pub port: u16,

    /// Maximum simultaneously connected clients
    pub max_clients: usize,

    /// Maximum length of one command line, terminator included
    pub max_line_length: usize,
}

/// Which credential store backs the service
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,

    /// SQLite database file, only read by the `sqlite` backend
    pub database_path: String,
}

/// Registration input policy
#[derive(Debug, Deserialize, Clone)]
pub struct AuthPolicy {
    pub min_username_length: usize,
    pub max_username_length: usize,
    pub max_password_length: usize,

    /// Reject registrations without an email address
    pub require_email: bool,

    /// Reject registrations without a display name
    pub require_name: bool,
}

impl Default for AuthPolicy {
    fn default() -> Self {
        Self {
            min_username_length: 3,
            max_username_length: 64,
            max_password_length: 128,
            require_email: false,
            require_name: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from ./config.toml (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(
            defaults()?
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(env_source()),
        )
    }

    /// Load configuration from an explicit file with environment overrides
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(
            defaults()?
                .add_source(File::from(path))
                .add_source(env_source()),
        )
    }

    /// Built-in defaults only, ignoring files and environment
    pub fn from_defaults() -> Result<Self, config::ConfigError> {
        Self::build(defaults()?)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let config: ServiceConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.server.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.server.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.server.max_line_length < 16 {
            return Err(config::ConfigError::Message(
                "max_line_length must be at least 16".into(),
            ));
        }

        if self.auth.min_username_length > self.auth.max_username_length {
            return Err(config::ConfigError::Message(
                "min_username_length cannot exceed max_username_length".into(),
            ));
        }

        if self.auth.max_password_length == 0 {
            return Err(config::ConfigError::Message(
                "max_password_length must be greater than 0".into(),
            ));
        }

        if self.storage.backend == StorageBackend::Sqlite && self.storage.database_path.is_empty()
        {
            return Err(config::ConfigError::Message(
                "database_path cannot be empty for the sqlite backend".into(),
            ));
        }

        Ok(())
    }
}

impl ServerSettings {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl StorageSettings {
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database_path)
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    let policy = AuthPolicy::default();

    Config::builder()
        .set_default("server.bind_address", "127.0.0.1")?
        .set_default("server.port", 2323_i64)?
        .set_default("server.max_clients", 10_i64)?
        .set_default("server.max_line_length", 512_i64)?
        .set_default("storage.backend", "memory")?
        .set_default("storage.database_path", "students.db")?
        .set_default("auth.min_username_length", policy.min_username_length as i64)?
        .set_default("auth.max_username_length", policy.max_username_length as i64)?
        .set_default("auth.max_password_length", policy.max_password_length as i64)?
        .set_default("auth.require_email", policy.require_email)?
        .set_default("auth.require_name", policy.require_name)
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::from_defaults().unwrap();
        assert_eq!(config.server.listen_socket(), "127.0.0.1:2323");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.auth.min_username_length, 3);
        assert!(!config.auth.require_email);
        assert!(!config.auth.require_name);
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 4100\n\n[storage]\nbackend = \"sqlite\"\ndatabase_path = \"users.db\"\n\n[auth]\nmin_username_length = 0\nrequire_email = true\nrequire_name = true"
        )
        .unwrap();

        let config = ServiceConfig::load_from(file.path()).unwrap();
        assert_eq!(config.server.port, 4100);
        assert_eq!(config.server.max_clients, 10);
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.database_path(), PathBuf::from("users.db"));
        assert_eq!(config.auth.min_username_length, 0);
        assert!(config.auth.require_email);
        assert!(config.auth.require_name);
    }

    #[test]
    fn rejects_inverted_username_bounds() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[auth]\nmin_username_length = 10\nmax_username_length = 5").unwrap();

        assert!(ServiceConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = 0").unwrap();

        let err = ServiceConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("port cannot be 0"));
    }

    #[test]
    fn rejects_zero_max_clients() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nmax_clients = 0").unwrap();

        assert!(ServiceConfig::load_from(file.path()).is_err());
    }
}
