//! Token service module for JWT management
//!
//! - HS256 token issuance, validation and refresh
//! - Optional revocation through a denylist
//! - Background eviction of expired denylist entries

mod cleanup;
mod clock;
mod config;
mod denylist;
mod service;


pub use cleanup::{DenylistCleanup, DenylistCleanupConfig};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TokenServiceConfig;
pub use denylist::{InMemoryDenylist, TokenDenylist};
pub use service::TokenService;
