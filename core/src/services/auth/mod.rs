//! Authentication service module
//!
//! Account registration, credential login, token refresh, profile
//! management, password change and logout.

mod config;
mod service;


pub use config::AuthServiceConfig;
pub use service::{AuthService, RegisterRequest};
