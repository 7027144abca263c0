//! Passage - minimal user accounts with bearer-token authentication
//!
//! Registration, login, logout with token revocation, and a guarded
//! profile endpoint. Usable as a library or through the `passage` binary.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;

pub use auth::AuthGate;
pub use config::Config;
pub use error::Error;
