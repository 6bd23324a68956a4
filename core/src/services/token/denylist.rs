//! Revoked token and session ids
//!
//! Tokens are stateless, so logout can only take effect by remembering the
//! `jti` and session id of the presented token until every token carrying
//! them would have expired anyway.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

/// Store of revoked token ids
pub trait TokenDenylist: Send + Sync {
    /// Remember `jti` as revoked until `expires_at` (unix seconds)
    fn revoke(&self, jti: Uuid, expires_at: i64);

    /// Whether `jti` is revoked at `now`
    fn is_revoked(&self, jti: &Uuid, now: i64) -> bool;

    /// Drop entries whose token has expired; returns how many were removed
    fn purge_expired(&self, now: i64) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local denylist guarded by a read/write lock
#[derive(Debug, Default)]
pub struct InMemoryDenylist {
    entries: RwLock<HashMap<Uuid, i64>>,
}

impl InMemoryDenylist {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenDenylist for InMemoryDenylist {
    fn revoke(&self, jti: Uuid, expires_at: i64) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(jti, expires_at);
    }

    fn is_revoked(&self, jti: &Uuid, now: i64) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(jti).map(|exp| now < *exp).unwrap_or(false)
    }

    fn purge_expired(&self, now: i64) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, exp| now < *exp);
        before - entries.len()
    }

    fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}
