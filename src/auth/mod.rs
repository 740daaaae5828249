//! Authentication system
//!
//! Handles registration, credential validation, and session login state.

pub mod credentials;
pub mod results;
pub mod service;
pub mod session;
pub mod validator;

pub use credentials::{hash_password, verify_password};
pub use service::{AuthService, ProfileUpdate};
pub use session::SessionFlag;
