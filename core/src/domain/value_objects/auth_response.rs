//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

use crate::domain::entities::user::User;

/// Returned by register and login
///
/// `refresh_token` is a second token of the same session with its own `jti`;
/// it can be exchanged for a new token once it is inside the refresh window.
/// Logging out with either token ends the session for both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: User,

    /// Bearer token for the `Authorization` header
    pub token: String,

    pub refresh_token: String,
}

impl AuthResponse {
    pub fn new(user: User, token: String, refresh_token: String) -> Self {
        Self {
            user,
            token,
            refresh_token,
        }
    }
}
