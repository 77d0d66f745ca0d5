//! Conversion dispatch contract: reporting a click to an external ad platform.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::AttributionContext;

/// Why a conversion event could not be delivered.
///
/// Every variant is terminal for the click: the caller records it and moves
/// on without retrying.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Pixel id or access token is not configured; nothing was sent.
    #[error("conversion API credentials are not configured")]
    MissingCredentials,

    #[error("conversion API request timed out")]
    Timeout,

    #[error("conversion API request failed: {0}")]
    Transport(String),

    /// The API answered with a non-2xx status.
    #[error("conversion API rejected the event with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

impl DispatchError {
    /// Returns true if a request may have reached the external API.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, DispatchError::MissingCredentials)
    }
}

/// Sends a single conversion event for one click.
///
/// Implementations make exactly one request and never retry.
///
/// # Implementations
///
/// - [`crate::infrastructure::conversions::MetaCapiDispatcher`] - Meta Conversions API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversionDispatcher: Send + Sync {
    /// Sends one event built from `context` for `link_id`.
    ///
    /// # Returns
    ///
    /// The external API's response body on a 2xx answer.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] on missing credentials, network failure,
    /// timeout or a non-2xx response.
    async fn dispatch(
        &self,
        context: &AttributionContext,
        link_id: i64,
    ) -> Result<Value, DispatchError>;

    /// Returns false when credentials are missing and every dispatch would fail.
    fn is_enabled(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_is_not_an_attempt() {
        assert!(!DispatchError::MissingCredentials.was_attempted());
        assert!(DispatchError::Timeout.was_attempted());
        assert!(DispatchError::Transport("dns".to_string()).was_attempted());
        assert!(
            DispatchError::Rejected {
                status: 400,
                body: "{}".to_string()
            }
            .was_attempted()
        );
    }

    #[test]
    fn test_rejected_message_includes_status() {
        let err = DispatchError::Rejected {
            status: 401,
            body: "invalid token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "conversion API rejected the event with status 401: invalid token"
        );
    }
}
