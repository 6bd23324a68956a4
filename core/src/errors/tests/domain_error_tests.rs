//! Unit tests for domain error types

use crate::errors::{AuthError, DomainError, ResourceKind, TokenError, ValidationError};

#[test]
fn test_token_error_bridges_into_domain_error() {
    let error: DomainError = TokenError::Expired.into();
    assert!(matches!(error, DomainError::Token(TokenError::Expired)));
    assert_eq!(error.to_string(), "Token expired");
}

#[test]
fn test_auth_error_bridges_into_domain_error() {
    let error: DomainError = AuthError::EmailExists.into();
    assert!(matches!(error, DomainError::Auth(AuthError::EmailExists)));
}

#[test]
fn test_missing_fields_message_lists_fields() {
    let error = ValidationError::missing_fields(["name", "area"]);
    assert_eq!(error.to_string(), "Missing required fields: name, area");
}

#[test]
fn test_not_found_uses_resource_name() {
    let error = DomainError::not_found(ResourceKind::Animal);
    assert_eq!(error.to_string(), "Animal not found");
}

#[test]
fn test_token_error_tags_are_distinct() {
    let all = [
        TokenError::Malformed,
        TokenError::WrongAlgorithm,
        TokenError::BadSignature,
        TokenError::Expired,
        TokenError::NotYetValid,
        TokenError::Revoked,
        TokenError::StillValid,
        TokenError::GenerationFailed,
    ];
    let mut tags: Vec<_> = all.iter().map(TokenError::as_str).collect();
    tags.sort_unstable();
    tags.dedup();
    assert_eq!(tags.len(), all.len());
}
