//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod period;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use period::{month_key, month_range, months_ago, trailing_months, DateRange, ReportPeriod};
