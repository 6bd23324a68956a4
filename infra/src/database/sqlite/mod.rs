//! SQLite-specific repository implementations
//!
//! Ids are stored as hyphenated UUID text, timestamps as RFC 3339 text with
//! millisecond precision and calendar dates as `YYYY-MM-DD`, so plain string
//! comparison orders all three correctly.

mod rows;

pub mod event_repository_impl;
pub mod land_repository_impl;
pub mod livestock_repository_impl;
pub mod notification_repository_impl;
pub mod production_repository_impl;
pub mod transaction_repository_impl;
pub mod user_repository_impl;

// Re-export the SQLite implementations
pub use event_repository_impl::SqliteEventRepository;
pub use land_repository_impl::SqliteLandRepository;
pub use livestock_repository_impl::SqliteLivestockRepository;
pub use notification_repository_impl::SqliteNotificationRepository;
pub use production_repository_impl::SqliteProductionRepository;
pub use transaction_repository_impl::SqliteTransactionRepository;
pub use user_repository_impl::SqliteUserRepository;
