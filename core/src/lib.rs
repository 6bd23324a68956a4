//! # Agri Core
//!
//! Domain layer of the farm management backend: entities, domain errors,
//! repository contracts and the password, token and authentication
//! services built on them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
