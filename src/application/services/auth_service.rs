//! Authentication service for the admin bearer token.

use sha2::{Digest, Sha256};

use crate::error::AppError;
use serde_json::json;

/// Service for authenticating admin requests via a Bearer token.
///
/// Only the SHA-256 digest of the configured token is kept in memory, and
/// incoming tokens are compared digest to digest.
pub struct AuthService {
    token_digest: Option<String>,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// `admin_token` of `None` (or an empty string) disables authentication.
    pub fn new(admin_token: Option<&str>) -> Self {
        let token_digest = admin_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(hash_token);

        Self { token_digest }
    }

    /// Returns true if admin routes require a token.
    pub fn is_enabled(&self) -> bool {
        self.token_digest.is_some()
    }

    /// Authenticates a raw bearer token.
    ///
    /// Always succeeds when authentication is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token does not match.
    pub fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let Some(expected) = &self.token_digest else {
            return Ok(());
        };

        if hash_token(token) != *expected {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Invalid admin token" }),
            ));
        }

        Ok(())
    }
}

/// Returns the 64-character lowercase hex SHA-256 digest of `token`.
fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_success() {
        let service = AuthService::new(Some("admin-secret"));

        assert!(service.is_enabled());
        assert!(service.authenticate("admin-secret").is_ok());
    }

    #[test]
    fn test_authenticate_invalid_token() {
        let service = AuthService::new(Some("admin-secret"));

        let result = service.authenticate("wrong");

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_disabled_accepts_anything() {
        let service = AuthService::new(None);

        assert!(!service.is_enabled());
        assert!(service.authenticate("").is_ok());
    }

    #[test]
    fn test_blank_token_disables_auth() {
        assert!(!AuthService::new(Some("  ")).is_enabled());
    }

    #[test]
    fn test_hash_token_consistency() {
        let hash1 = hash_token("test-token");
        let hash2 = hash_token("test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, hash_token("other-token"));
    }
}
