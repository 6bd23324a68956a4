//! Application state and factory
//!
//! `AppState` wires the configuration, the repositories and the domain
//! services together once per process. `create_app` builds the actix
//! application around it so that `main` and the integration tests share
//! exactly the same routing and middleware stack.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use chrono::{DateTime, Utc};
use tracing_actix_web::TracingLogger;

use agri_core::repositories::Repositories;
use agri_core::services::{
    AuthService, AuthServiceConfig, BackupService, DashboardService, InMemoryDenylist,
    PasswordHasher, ReportService, SettingsService, TokenDenylist, TokenService,
    TokenServiceConfig, WeatherService,
};
use agri_infra::{build_repositories, DatabasePool};
use agri_shared::config::AppConfig;
use agri_shared::error_codes;
use agri_shared::types::HealthStatus;

use crate::handlers::error::ApiError;
use crate::handlers::response;
use crate::middleware::{cors::create_cors, JwtAuth, RequestId, RequestIdMiddleware};
use crate::routes;

pub const SERVICE_NAME: &str = "agri-management-api";

/// Shared state handed to every handler through `web::Data`
pub struct AppState {
    pub config: AppConfig,
    pub pool: DatabasePool,
    pub repos: Repositories,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub settings: Arc<SettingsService>,
    pub dashboard: DashboardService,
    pub reports: ReportService,
    pub backup: BackupService,
    pub weather: WeatherService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds every service over an already bootstrapped pool
    pub fn new(config: AppConfig, pool: DatabasePool) -> Self {
        let repos = build_repositories(pool.get_pool());

        let mut tokens = TokenService::new(TokenServiceConfig::from(&config.auth.jwt));
        if config.auth.denylist_enabled {
            let denylist: Arc<dyn TokenDenylist> = Arc::new(InMemoryDenylist::new());
            tokens = tokens.with_denylist(denylist);
        }
        let tokens = Arc::new(tokens);

        let auth = Arc::new(AuthService::new(
            Arc::clone(&repos.users),
            Arc::clone(&tokens),
            PasswordHasher::new(config.auth.bcrypt_cost),
            AuthServiceConfig::default(),
        ));

        Self {
            dashboard: DashboardService::new(repos.clone()),
            reports: ReportService::new(repos.clone()),
            backup: BackupService::new(repos.clone()),
            settings: Arc::new(SettingsService::new()),
            weather: WeatherService::new(),
            started_at: Utc::now(),
            config,
            pool,
            repos,
            tokens,
            auth,
        }
    }

    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }

    /// `connected` when a trivial query succeeds
    pub async fn database_status(&self) -> &'static str {
        match self.pool.health_check().await {
            Ok(true) => "connected",
            _ => "disconnected",
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors = create_cors(&state.config.cors, state.config.environment);
    let tokens = Arc::clone(&state.tokens);
    let jwt = move || JwtAuth::new(Arc::clone(&tokens));
    let payload_limit = state.config.server.max_payload_size;

    App::new()
        .app_data(state)
        .app_data(response::json_config().limit(payload_limit))
        .app_data(response::query_config())
        .app_data(response::path_config())
        // The last wrap runs first, so request ids exist before logging and CORS
        .wrap(cors)
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .route("/health", web::get().to(health_check))
        .route("/", web::get().to(index))
        .service(
            web::scope("/api/v1")
                .route("", web::get().to(index))
                .route("/", web::get().to(index))
                .service(web::scope("/auth").configure(|cfg| routes::auth::configure(cfg, jwt())))
                .service(
                    web::scope("/dashboard")
                        .wrap(jwt())
                        .configure(routes::dashboard::configure),
                )
                .service(web::scope("/lands").wrap(jwt()).configure(routes::lands::configure))
                .service(
                    web::scope("/livestock")
                        .wrap(jwt())
                        .configure(routes::livestock::configure),
                )
                .service(
                    web::scope("/production")
                        .wrap(jwt())
                        .configure(routes::production::configure),
                )
                .service(web::scope("/finance").wrap(jwt()).configure(routes::finance::configure))
                .service(
                    web::scope("/calendar")
                        .wrap(jwt())
                        .configure(routes::calendar::configure),
                )
                .service(
                    web::scope("/notifications")
                        .wrap(jwt())
                        .configure(routes::notifications::configure),
                )
                .service(
                    web::scope("/settings")
                        .wrap(jwt())
                        .configure(routes::settings::configure),
                )
                .service(web::scope("/weather").wrap(jwt()).configure(routes::weather::configure))
                .service(web::scope("/reports").wrap(jwt()).configure(routes::reports::configure)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let database = state.database_status().await;
    let status = if database == "connected" {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
        "database": database,
    }))
}

/// API index
async fn index(request_id: RequestId) -> HttpResponse {
    response::ok(
        serde_json::json!({
            "name": "Farm Management API",
            "version": env!("CARGO_PKG_VERSION"),
            "health": "/health",
            "auth": {
                "register": "POST /api/v1/auth/register",
                "login": "POST /api/v1/auth/login",
                "refresh": "POST /api/v1/auth/refresh",
                "profile": "GET|PUT /api/v1/auth/profile",
                "changePassword": "PUT /api/v1/auth/change-password",
                "logout": "POST /api/v1/auth/logout",
            },
            "resources": [
                "/api/v1/dashboard",
                "/api/v1/lands",
                "/api/v1/livestock",
                "/api/v1/production",
                "/api/v1/finance",
                "/api/v1/calendar",
                "/api/v1/notifications",
                "/api/v1/settings",
                "/api/v1/weather",
                "/api/v1/reports",
            ],
            "authentication": "Authorization: Bearer <token>",
        }),
        &request_id,
    )
}

/// Default 404 handler
async fn not_found(request_id: RequestId) -> Result<HttpResponse, ApiError> {
    Err(
        ApiError::not_found(error_codes::NOT_FOUND, "The requested resource was not found")
            .with_request_id(&request_id),
    )
}
