//! DTOs for the click tracking endpoint.

use serde::Serialize;

use crate::application::services::TrackedClick;

/// Response for `POST /click/{link_id}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickResponse {
    pub success: bool,
    pub redirect_url: String,
    /// True only if the conversion API accepted the event.
    pub meta_capi_sent: bool,
    pub data: ClickData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickData {
    pub link_id: i64,
    pub title: String,
    pub url: String,
    pub click_count: i64,
}

impl From<TrackedClick> for ClickResponse {
    fn from(tracked: TrackedClick) -> Self {
        let meta_capi_sent = tracked.dispatch_succeeded();
        let TrackedClick {
            link, click_count, ..
        } = tracked;

        Self {
            success: true,
            redirect_url: link.url.clone(),
            meta_capi_sent,
            data: ClickData {
                link_id: link.id,
                title: link.title,
                url: link.url,
                click_count,
            },
        }
    }
}
