//! Unit tests for session claims

use uuid::Uuid;

use crate::domain::entities::token::{Claims, JWT_ISSUER};
use crate::domain::entities::user::UserRole;

#[test]
fn test_claims_window() {
    let user_id = Uuid::new_v4();
    let claims = Claims::new(user_id, "a@b.co", UserRole::Farmer, JWT_ISSUER, 1_000, 60);

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.iat, 1_000);
    assert_eq!(claims.nbf, 1_000);
    assert_eq!(claims.exp, 1_060);

    assert!(!claims.is_active_at(999));
    assert!(claims.is_active_at(1_000));
    assert!(claims.is_active_at(1_059));
    assert!(!claims.is_active_at(1_060));
    assert_eq!(claims.remaining_secs(1_030), 30);
}

#[test]
fn test_each_claims_gets_fresh_jti() {
    let user_id = Uuid::new_v4();
    let a = Claims::new(user_id, "a@b.co", UserRole::Farmer, JWT_ISSUER, 0, 60);
    let b = Claims::new(user_id, "a@b.co", UserRole::Farmer, JWT_ISSUER, 0, 60);
    assert_ne!(a.jti, b.jti);
    assert_ne!(a.sid, b.sid);

    let joined = b.in_session(a.sid);
    assert_eq!(joined.sid, a.sid);
    assert_ne!(joined.jti, a.jti);
}

#[test]
fn test_claims_wire_names() {
    let claims = Claims::new(Uuid::new_v4(), "a@b.co", UserRole::Admin, JWT_ISSUER, 0, 60);
    let value = serde_json::to_value(&claims).unwrap();
    for key in ["sub", "user_id", "email", "role", "iat", "nbf", "exp", "iss", "jti", "sid"] {
        assert!(value.get(key).is_some(), "missing claim {}", key);
    }
    assert_eq!(value["role"], "admin");
    assert_eq!(value["iss"], "agri-management-api");
}
