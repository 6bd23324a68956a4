//! Session claims carried inside signed tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Issuer written into and required from every token
pub const JWT_ISSUER: &str = "agri-management-api";

/// Claims structure for the JWT payload
///
/// `sub` and `user_id` carry the same id; `user_id` exists for clients that
/// read the payload directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    pub user_id: Uuid,

    pub email: String,

    pub role: UserRole,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Not before (unix seconds)
    pub nbf: i64,

    /// Expiration (unix seconds); the token is invalid from this instant on
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Unique token id, used for revocation
    pub jti: Uuid,

    /// Session id shared by every token of one sign-in, refreshes included
    pub sid: Uuid,
}

impl Claims {
    /// Builds claims valid from `now` for `lifetime_secs` seconds
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        role: UserRole,
        issuer: impl Into<String>,
        now: i64,
        lifetime_secs: i64,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            user_id,
            email: email.into(),
            role,
            iat: now,
            nbf: now,
            exp: now + lifetime_secs,
            iss: issuer.into(),
            jti: Uuid::new_v4(),
            sid: Uuid::new_v4(),
        }
    }

    /// Moves the claims into an existing session
    pub fn in_session(mut self, sid: Uuid) -> Self {
        self.sid = sid;
        self
    }

    /// True while `nbf <= now < exp`
    pub fn is_active_at(&self, now: i64) -> bool {
        self.nbf <= now && now < self.exp
    }

    /// Seconds of validity left at `now` (negative once expired)
    pub fn remaining_secs(&self, now: i64) -> i64 {
        self.exp - now
    }
}
