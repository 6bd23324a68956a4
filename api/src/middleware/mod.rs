pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::*;
pub use cors::*;
pub use request_id::*;
