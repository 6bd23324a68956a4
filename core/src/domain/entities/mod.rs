//! Domain entities representing core business objects.

pub mod common;
pub mod event;
pub mod land;
pub mod livestock;
pub mod notification;
pub mod production;
pub mod token;
pub mod transaction;
pub mod user;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use common::{ActivityItem, CategoryAmount, CategoryCount};
pub use event::{Event, EventFilter, EventStatistics, EventStatus, EventUpdate, NewEvent};
pub use land::{
    CropShare, GeoLocation, Land, LandActivity, LandFilter, LandProductivity, LandStatistics,
    LandUpdate, NewLand, NewLandActivity,
};
pub use livestock::{
    Animal, AnimalFilter, AnimalUpdate, HealthRecord, LivestockStatistics, MilkRecord,
    NewAnimal, NewHealthRecord, NewMilkRecord,
};
pub use notification::{Notification, NotificationFilter};
pub use production::{
    MonthlyProduction, NewProduction, Production, ProductionFilter, ProductionStatistics,
    ProductionUpdate, PRODUCTION_CATEGORIES,
};
pub use token::{Claims, JWT_ISSUER};
pub use transaction::{
    FinanceTotals, MonthlyFinance, NewTransaction, Transaction, TransactionFilter,
    TransactionType, TransactionUpdate, EXPENSE_CATEGORIES, INCOME_CATEGORIES,
};
pub use user::{ProfileUpdate, User, UserRole};
