//! Click event entity: the append-only record of a single accepted click.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

/// Request-derived signals used for ad attribution.
///
/// Every field is optional; a missing header or cookie is `None`, never an error.
/// Values are stored and forwarded as received, without hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub fbp: Option<String>,
    pub fbc: Option<String>,
}

/// Longest string kept from an external response, in bytes.
pub const MAX_STORED_TEXT_BYTES: usize = 2048;

/// Stored result of the conversion dispatch for one click.
///
/// Only three shapes are constructible: not attempted (no payload),
/// delivered (external response), failed (`{"error": ...}` payload).
/// Payload strings have NUL characters removed and are capped at
/// [`MAX_STORED_TEXT_BYTES`], since Postgres `JSONB` rejects `\u0000`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    attempted: bool,
    succeeded: bool,
    response: Option<Value>,
}

impl DispatchOutcome {
    /// No request was sent to the external API.
    pub fn not_attempted() -> Self {
        Self {
            attempted: false,
            succeeded: false,
            response: None,
        }
    }

    /// The external API accepted the event and returned `response`.
    pub fn delivered(response: Value) -> Self {
        Self {
            attempted: true,
            succeeded: true,
            response: Some(storable_value(response)),
        }
    }

    /// The request was attempted and failed with `error`.
    pub fn failed(error: impl std::fmt::Display) -> Self {
        Self {
            attempted: true,
            succeeded: false,
            response: Some(json!({ "error": storable_text(&error.to_string()) })),
        }
    }

    /// Rebuilds an outcome from stored columns.
    ///
    /// Rows that violate the shape rules (e.g. written by hand) are normalized
    /// rather than rejected: anything not attempted carries no payload.
    pub fn from_parts(attempted: bool, succeeded: bool, response: Option<Value>) -> Self {
        if attempted {
            Self {
                attempted,
                succeeded,
                response,
            }
        } else {
            Self::not_attempted()
        }
    }

    pub fn attempted(&self) -> bool {
        self.attempted
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn response(&self) -> Option<&Value> {
        self.response.as_ref()
    }
}

fn storable_text(text: &str) -> String {
    let mut cleaned: String = text.chars().filter(|c| *c != '\0').collect();
    if cleaned.len() > MAX_STORED_TEXT_BYTES {
        let mut end = MAX_STORED_TEXT_BYTES;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    cleaned
}

fn storable_value(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(storable_text(&text)),
        Value::Array(items) => Value::Array(items.into_iter().map(storable_value).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(key, value)| (storable_text(&key), storable_value(value)))
                .collect(),
        ),
        other => other,
    }
}

/// A persisted click event.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub id: i64,
    pub link_id: i64,
    pub attribution: AttributionContext,
    pub clicked_at: DateTime<Utc>,
    pub dispatch: DispatchOutcome,
}

/// Input data for recording a click. `clicked_at` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewClickEvent {
    pub link_id: i64,
    pub attribution: AttributionContext,
    pub dispatch: DispatchOutcome,
}

/// Title and URL of the link a click event points at, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSummary {
    pub id: i64,
    pub title: String,
    pub url: String,
}

/// A click event joined with its link. `link` is `None` when the link is gone.
#[derive(Debug, Clone)]
pub struct RecentClick {
    pub event: ClickEvent,
    pub link: Option<LinkSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_attempted_has_no_payload() {
        let outcome = DispatchOutcome::not_attempted();

        assert!(!outcome.attempted());
        assert!(!outcome.succeeded());
        assert!(outcome.response().is_none());
    }

    #[test]
    fn test_delivered_keeps_response() {
        let outcome = DispatchOutcome::delivered(json!({ "events_received": 1 }));

        assert!(outcome.attempted());
        assert!(outcome.succeeded());
        assert_eq!(outcome.response().unwrap()["events_received"], 1);
    }

    #[test]
    fn test_payload_strings_drop_nul_characters() {
        let failed = DispatchOutcome::failed("status 502: bad gateway\0");
        assert_eq!(
            failed.response(),
            Some(&json!({ "error": "status 502: bad gateway" }))
        );

        let delivered =
            DispatchOutcome::delivered(json!({ "trace\0": ["a\0b"], "events_received": 1 }));
        assert_eq!(
            delivered.response(),
            Some(&json!({ "trace": ["ab"], "events_received": 1 }))
        );
    }

    #[test]
    fn test_payload_strings_are_capped_on_char_boundary() {
        let page = "é".repeat(MAX_STORED_TEXT_BYTES);

        let outcome = DispatchOutcome::delivered(Value::String(page));

        let stored = outcome.response().unwrap().as_str().unwrap();
        assert_eq!(stored.len(), MAX_STORED_TEXT_BYTES);
        assert!(stored.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_failed_wraps_error_message() {
        let outcome = DispatchOutcome::failed("connection refused");

        assert!(outcome.attempted());
        assert!(!outcome.succeeded());
        assert_eq!(
            outcome.response(),
            Some(&json!({ "error": "connection refused" }))
        );
    }

    #[test]
    fn test_from_parts_normalizes_unattempted_rows() {
        let outcome = DispatchOutcome::from_parts(false, true, Some(json!({ "stale": true })));
        assert_eq!(outcome, DispatchOutcome::not_attempted());

        let outcome = DispatchOutcome::from_parts(true, false, Some(json!({ "error": "x" })));
        assert!(outcome.attempted());
        assert!(!outcome.succeeded());
    }

    #[test]
    fn test_attribution_default_is_empty() {
        let ctx = AttributionContext::default();

        assert!(ctx.ip_address.is_none());
        assert!(ctx.user_agent.is_none());
        assert!(ctx.referer.is_none());
        assert!(ctx.fbp.is_none());
        assert!(ctx.fbc.is_none());
    }
}
