pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod utils;

pub use auth::AuthService;
pub use server::Server;
pub use storage::CredentialStore;
