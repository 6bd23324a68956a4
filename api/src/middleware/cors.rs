//! CORS middleware configuration for cross-origin requests.
//!
//! Browser dashboards and mobile clients call the API from other origins.
//! Outside production every origin is accepted; in production only the
//! origins listed in `ALLOWED_ORIGINS` are.

use actix_cors::Cors;
use actix_web::http::{header, Method};
use agri_shared::config::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given configuration
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_production() && !config.allows_any_origin() {
        create_restricted_cors(config)
    } else {
        create_permissive_cors(config.max_age)
    }
}

fn allowed_methods() -> Vec<Method> {
    vec![
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::OPTIONS,
    ]
}

fn allowed_headers() -> Vec<header::HeaderName> {
    vec![
        header::AUTHORIZATION,
        header::ACCEPT,
        header::CONTENT_TYPE,
        header::ORIGIN,
        header::HeaderName::from_static("x-requested-with"),
        header::HeaderName::from_static("x-request-id"),
    ]
}

fn create_permissive_cors(max_age: usize) -> Cors {
    tracing::info!("Configuring permissive CORS");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(allowed_methods())
        .allowed_headers(allowed_headers())
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(max_age)
}

fn create_restricted_cors(config: &CorsConfig) -> Cors {
    tracing::info!(origins = config.allowed_origins.len(), "Configuring restricted CORS");

    let mut cors = Cors::default()
        .allowed_methods(allowed_methods())
        .allowed_headers(allowed_headers())
        .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
        .max_age(config.max_age)
        .supports_credentials();

    for origin in &config.allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
