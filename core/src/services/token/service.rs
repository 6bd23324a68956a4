//! Main token service implementation

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error};
use uuid::Uuid;

use crate::domain::entities::token::Claims;
use crate::domain::entities::user::UserRole;
use crate::errors::TokenError;

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::denylist::TokenDenylist;

/// Issues, validates, refreshes and revokes HMAC-signed session tokens
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
    denylist: Option<Arc<dyn TokenDenylist>>,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Secret, issuer and lifetimes
    ///
    /// # Returns
    ///
    /// A service reading the wall clock with no denylist
    pub fn new(config: TokenServiceConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // Any HMAC variant verifies against the shared secret; time checks
        // run against the injected clock instead of the library's.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "sub", "iss"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            clock: Arc::new(SystemClock),
            denylist: None,
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Enable revocation checks against a denylist
    pub fn with_denylist(mut self, denylist: Arc<dyn TokenDenylist>) -> Self {
        self.denylist = Some(denylist);
        self
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    pub fn denylist(&self) -> Option<Arc<dyn TokenDenylist>> {
        self.denylist.clone()
    }

    /// Issues a token for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID (written to `sub` and `user_id`)
    /// * `email` - The user's email
    /// * `role` - The user's role
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact JWT signed with HS256
    /// * `Err(TokenError::GenerationFailed)` - Signing failed
    pub fn issue(&self, user_id: Uuid, email: &str, role: UserRole) -> Result<String, TokenError> {
        self.sign(&self.claims_for(user_id, email, role))
    }

    /// Issues an access token and a refresh token belonging to one session
    ///
    /// Revoking either token ends the session for both.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: UserRole,
    ) -> Result<(String, String), TokenError> {
        let access = self.claims_for(user_id, email, role);
        let refresh = self.claims_for(user_id, email, role).in_session(access.sid);
        Ok((self.sign(&access)?, self.sign(&refresh)?))
    }

    fn claims_for(&self, user_id: Uuid, email: &str, role: UserRole) -> Claims {
        Claims::new(
            user_id,
            email,
            role,
            self.config.issuer.as_str(),
            self.clock.now(),
            self.config.expiry_seconds,
        )
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            error!("Failed to sign token: {}", e);
            TokenError::GenerationFailed
        })
    }

    /// Validates a token and returns its claims
    ///
    /// A token is accepted iff its signature verifies, its issuer matches,
    /// `nbf <= now < exp` holds and neither its `jti` nor its session is revoked.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| map_decode_error(e.kind()))?;
        let claims = data.claims;

        let now = self.clock.now();
        if now < claims.nbf {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.exp {
            return Err(TokenError::Expired);
        }
        if let Some(denylist) = &self.denylist {
            if denylist.is_revoked(&claims.jti, now) || denylist.is_revoked(&claims.sid, now) {
                return Err(TokenError::Revoked);
            }
        }

        Ok(claims)
    }

    /// Exchanges a token that is close to expiry for a fresh one
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - New token for the same user, email and role
    /// * `Err(TokenError::StillValid)` - More than the refresh window remains
    /// * `Err(TokenError)` - The presented token is not valid
    pub fn refresh(&self, token: &str) -> Result<String, TokenError> {
        let claims = self.validate(token)?;
        let remaining = claims.remaining_secs(self.clock.now());
        if remaining > self.config.refresh_window_seconds {
            debug!(remaining, "Refresh refused, token still valid");
            return Err(TokenError::StillValid);
        }
        let fresh = self
            .claims_for(claims.user_id, &claims.email, claims.role)
            .in_session(claims.sid);
        self.sign(&fresh)
    }

    /// Revokes a validated token and the session it belongs to
    ///
    /// The `jti` is kept until the token's own expiry. The session is kept
    /// for one full token lifetime, which outlasts every token issued in it
    /// because refresh stops working once the session is revoked.
    ///
    /// # Returns
    ///
    /// `false` when no denylist is configured and the call had no effect
    pub fn revoke(&self, claims: &Claims) -> bool {
        match &self.denylist {
            Some(denylist) => {
                denylist.revoke(claims.jti, claims.exp);
                denylist.revoke(claims.sid, self.clock.now() + self.config.expiry_seconds);
                true
            }
            None => false,
        }
    }
}

fn map_decode_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::WrongAlgorithm,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        _ => TokenError::Malformed,
    }
}
