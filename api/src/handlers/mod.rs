pub mod error;
pub mod response;

pub use error::{map_domain_error, ApiError, ApiResult, OptionExt, ResultExt};
