//! Repository contracts implemented by the infrastructure layer.

pub mod event;
pub mod land;
pub mod livestock;
pub mod notification;
pub mod production;
pub mod transaction;
pub mod user;

pub use event::EventRepository;
pub use land::LandRepository;
pub use livestock::LivestockRepository;
pub use notification::NotificationRepository;
pub use production::ProductionRepository;
pub use transaction::TransactionRepository;
pub use user::{MockUserRepository, UserRepository};

use std::sync::Arc;

/// All repositories the application works with, as shared trait objects
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub lands: Arc<dyn LandRepository>,
    pub livestock: Arc<dyn LivestockRepository>,
    pub production: Arc<dyn ProductionRepository>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub events: Arc<dyn EventRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}
