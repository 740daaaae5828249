//! Server core functionality
//!
//! Listener, accept loop and per-client task spawning.

pub mod core;

pub use core::Server;
