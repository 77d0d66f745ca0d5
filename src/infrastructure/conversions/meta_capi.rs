//! Meta Conversions API client.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::domain::conversion::{ConversionDispatcher, DispatchError};
use crate::domain::entities::AttributionContext;

const EVENT_NAME: &str = "PageView";
const EVENT_TYPE: &str = "link_click";
const EVENT_SOURCE: &str = "linktree_backend";

/// Settings for the Meta Conversions API, passed in at construction.
///
/// Dispatch is enabled only when both `pixel_id` and `access_token` are set.
#[derive(Clone)]
pub struct ConversionConfig {
    pub pixel_id: Option<String>,
    pub access_token: Option<String>,
    /// Graph API base, e.g. `https://graph.facebook.com`.
    pub graph_url: String,
    pub api_version: String,
    /// Used as `event_source_url` when the click has no referer.
    pub default_source_url: String,
    pub timeout: Duration,
    /// When false, client IP and user agent are left out of the payload.
    pub forward_client_data: bool,
}

impl ConversionConfig {
    fn credentials(&self) -> Option<(&str, &str)> {
        match (self.pixel_id.as_deref(), self.access_token.as_deref()) {
            (Some(pixel), Some(token)) if !pixel.is_empty() && !token.is_empty() => {
                Some((pixel, token))
            }
            _ => None,
        }
    }

    fn endpoint(&self, pixel_id: &str) -> String {
        format!(
            "{}/{}/{}/events",
            self.graph_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            pixel_id
        )
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("pixel_id", &self.pixel_id)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("graph_url", &self.graph_url)
            .field("api_version", &self.api_version)
            .field("default_source_url", &self.default_source_url)
            .field("timeout", &self.timeout)
            .field("forward_client_data", &self.forward_client_data)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct EventBatch<'a> {
    data: [ConversionEvent<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ConversionEvent<'a> {
    event_name: &'static str,
    event_time: i64,
    event_source_url: &'a str,
    user_data: UserData<'a>,
    custom_data: CustomData,
}

/// Attribution fields, forwarded unhashed.
#[derive(Debug, Serialize)]
struct UserData<'a> {
    client_ip_address: Option<&'a str>,
    client_user_agent: Option<&'a str>,
    fbp: Option<&'a str>,
    fbc: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CustomData {
    link_id: String,
    event_type: &'static str,
    source: &'static str,
}

fn build_payload<'a>(
    config: &'a ConversionConfig,
    context: &'a AttributionContext,
    link_id: i64,
    sent_at: DateTime<Utc>,
) -> EventBatch<'a> {
    let (client_ip_address, client_user_agent) = if config.forward_client_data {
        (
            context.ip_address.as_deref(),
            context.user_agent.as_deref(),
        )
    } else {
        (None, None)
    };

    EventBatch {
        data: [ConversionEvent {
            event_name: EVENT_NAME,
            event_time: sent_at.timestamp(),
            event_source_url: context
                .referer
                .as_deref()
                .unwrap_or(config.default_source_url.as_str()),
            user_data: UserData {
                client_ip_address,
                client_user_agent,
                fbp: context.fbp.as_deref(),
                fbc: context.fbc.as_deref(),
            },
            custom_data: CustomData {
                link_id: link_id.to_string(),
                event_type: EVENT_TYPE,
                source: EVENT_SOURCE,
            },
        }],
    }
}

/// The URL carries the access token, so it is stripped from every error.
fn map_reqwest_error(e: reqwest::Error) -> DispatchError {
    if e.is_timeout() {
        DispatchError::Timeout
    } else {
        DispatchError::Transport(e.without_url().to_string())
    }
}

/// Sends one `PageView` event per click to the Meta Conversions API.
///
/// One POST per call, no retry. The HTTP client enforces
/// [`ConversionConfig::timeout`] on the whole request.
pub struct MetaCapiDispatcher {
    client: reqwest::Client,
    config: ConversionConfig,
}

impl MetaCapiDispatcher {
    /// Creates a dispatcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: ConversionConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }
}

#[async_trait]
impl ConversionDispatcher for MetaCapiDispatcher {
    async fn dispatch(
        &self,
        context: &AttributionContext,
        link_id: i64,
    ) -> Result<Value, DispatchError> {
        let (pixel_id, access_token) = self
            .config
            .credentials()
            .ok_or(DispatchError::MissingCredentials)?;

        let payload = build_payload(&self.config, context, link_id, Utc::now());
        debug!(link_id, "Sending conversion event");

        let response = self
            .client
            .post(self.config.endpoint(pixel_id))
            .query(&[("access_token", access_token)])
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            warn!(link_id, status = status.as_u16(), "Conversion API rejected event");
            return Err(DispatchError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!(link_id, "Conversion event sent");
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    fn is_enabled(&self) -> bool {
        self.config.credentials().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> ConversionConfig {
        ConversionConfig {
            pixel_id: Some("123456".to_string()),
            access_token: Some("secret-token".to_string()),
            graph_url: "https://graph.facebook.com/".to_string(),
            api_version: "v17.0".to_string(),
            default_source_url: "https://yourdomain.com".to_string(),
            timeout: Duration::from_secs(5),
            forward_client_data: true,
        }
    }

    fn context() -> AttributionContext {
        AttributionContext {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("Mozilla/5.0".to_string()),
            referer: None,
            fbp: Some("fb.1.1.abc".to_string()),
            fbc: None,
        }
    }

    #[test]
    fn test_payload_shape() {
        let config = config();
        let ctx = context();
        let sent_at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let json = serde_json::to_value(build_payload(&config, &ctx, 42, sent_at)).unwrap();
        let event = &json["data"][0];

        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(event["event_name"], "PageView");
        assert_eq!(event["event_time"], 1_714_557_600);
        assert_eq!(event["event_source_url"], "https://yourdomain.com");
        assert_eq!(event["user_data"]["client_ip_address"], "203.0.113.7");
        assert_eq!(event["user_data"]["client_user_agent"], "Mozilla/5.0");
        assert_eq!(event["user_data"]["fbp"], "fb.1.1.abc");
        assert!(event["user_data"]["fbc"].is_null());
        assert_eq!(event["custom_data"]["link_id"], "42");
        assert_eq!(event["custom_data"]["event_type"], "link_click");
        assert_eq!(event["custom_data"]["source"], "linktree_backend");
    }

    #[test]
    fn test_payload_uses_referer_when_present() {
        let config = config();
        let ctx = AttributionContext {
            referer: Some("https://instagram.com/".to_string()),
            ..context()
        };

        let json = serde_json::to_value(build_payload(&config, &ctx, 1, Utc::now())).unwrap();
        assert_eq!(json["data"][0]["event_source_url"], "https://instagram.com/");
    }

    #[test]
    fn test_payload_without_client_data() {
        let config = ConversionConfig {
            forward_client_data: false,
            ..config()
        };
        let ctx = context();

        let json = serde_json::to_value(build_payload(&config, &ctx, 1, Utc::now())).unwrap();
        let user_data = &json["data"][0]["user_data"];
        assert!(user_data["client_ip_address"].is_null());
        assert!(user_data["client_user_agent"].is_null());
        assert_eq!(user_data["fbp"], "fb.1.1.abc");
    }

    #[test]
    fn test_endpoint_trims_slashes() {
        assert_eq!(
            config().endpoint("123456"),
            "https://graph.facebook.com/v17.0/123456/events"
        );
    }

    #[test]
    fn test_credentials_require_both_values() {
        assert!(config().credentials().is_some());

        let no_token = ConversionConfig {
            access_token: None,
            ..config()
        };
        assert!(no_token.credentials().is_none());

        let empty_pixel = ConversionConfig {
            pixel_id: Some(String::new()),
            ..config()
        };
        assert!(empty_pixel.credentials().is_none());
    }

    #[test]
    fn test_debug_masks_access_token() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("***"));
    }

    #[tokio::test]
    async fn test_dispatch_without_credentials() {
        let dispatcher = MetaCapiDispatcher::new(ConversionConfig {
            pixel_id: None,
            ..config()
        })
        .unwrap();

        assert!(!dispatcher.is_enabled());
        let result = dispatcher.dispatch(&context(), 1).await;
        assert!(matches!(result, Err(DispatchError::MissingCredentials)));
    }
}
