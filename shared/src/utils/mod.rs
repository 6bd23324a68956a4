//! Common utility functions

pub mod duration;
pub mod validation;

pub use duration::{parse_duration, DurationParseError};
