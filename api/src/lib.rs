//! # Agri API
//!
//! HTTP layer of the farm management backend: the actix-web application,
//! its middleware (request ids, JWT authentication, CORS), request DTOs
//! and the route handlers for every resource.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
