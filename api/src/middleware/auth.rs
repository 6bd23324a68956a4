//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware reads the `Authorization` header, validates the bearer
//! token with the core `TokenService` and injects an [`AuthContext`] into
//! the request extensions. Requests that fail are answered with a 401
//! envelope and never reach the handler.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use agri_core::{
    domain::entities::{token::Claims, user::UserRole},
    services::token::TokenService,
};
use agri_shared::error_codes;
use chrono::{DateTime, TimeZone, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::handlers::error::ApiError;
use crate::middleware::request_id::RequestId;

/// Authenticated caller, available to handlers as an extractor
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// User ID taken from the token
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    /// Token id, used for revocation on logout
    pub jti: Uuid,
    pub expires_at: DateTime<Utc>,
    /// Full claims of the presented token
    pub claims: Claims,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self {
            user_id: claims.user_id,
            email: claims.email.clone(),
            role: claims.role,
            jti: claims.jti,
            expires_at,
            claims,
        }
    }
}

/// Why the `Authorization` header could not be turned into a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    Missing,
    BadFormat,
}

/// Splits `Authorization` into exactly `["Bearer", token]`
///
/// HTTP parsing strips trailing whitespace from header values, so a client
/// sending `"Bearer "` arrives as `"Bearer"` and gets `BadFormat`. Only an
/// in-process `"Bearer "` reaches here intact; its empty token then fails
/// validation.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, HeaderError> {
    let header = match header {
        None | Some("") => return Err(HeaderError::Missing),
        Some(value) => value,
    };
    let parts: Vec<&str> = header.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(HeaderError::BadFormat),
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    tokens: Arc<TokenService>,
}

impl JwtAuth {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let outcome = authenticate(&self.tokens, &req);
        Box::pin(async move {
            match outcome {
                Ok(context) => {
                    req.extensions_mut().insert(context);
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    let request_id = RequestId::of(req.request());
                    let response = error.with_request_id(&request_id).error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

fn authenticate(tokens: &TokenService, req: &ServiceRequest) -> Result<AuthContext, ApiError> {
    let bad_format = || {
        ApiError::unauthorized(
            error_codes::INVALID_TOKEN_FORMAT,
            "Authorization header must be 'Bearer <token>'",
        )
    };
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| bad_format())?),
        None => None,
    };

    let token = parse_bearer(header).map_err(|e| match e {
        HeaderError::Missing => {
            ApiError::unauthorized(error_codes::MISSING_TOKEN, "Authorization token is required")
        }
        HeaderError::BadFormat => bad_format(),
    })?;

    match tokens.validate(token) {
        Ok(claims) => Ok(AuthContext::from_claims(claims)),
        Err(reason) => {
            tracing::warn!(
                reason = reason.as_str(),
                path = %req.path(),
                "Rejected bearer token"
            );
            Err(ApiError::unauthorized(
                error_codes::INVALID_TOKEN,
                "Invalid or expired token",
            ))
        }
    }
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Error> = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            ApiError::unauthorized(error_codes::UNAUTHORIZED, "Authentication required")
                .with_request_id(&RequestId::of(req))
                .into()
        });

        ready(result)
    }
}
