//! Route handlers grouped by resource
//!
//! Each module exposes a `configure` function mounted under `/api/v1/<resource>`
//! by [`crate::app::create_app`]. Fixed paths such as `/statistics` are
//! registered before `/{id}` so they are never captured as ids.

pub mod auth;
pub mod calendar;
pub mod dashboard;
pub mod finance;
pub mod lands;
pub mod livestock;
pub mod notifications;
pub mod production;
pub mod reports;
pub mod settings;
pub mod weather;
