//! DTOs for the analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::application::services::{DailyClicks, StatsSnapshot};
use crate::domain::entities::{AttributionContext, Link, LinkSummary, RecentClick};

/// `data` payload of `GET /stats`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub total_clicks: i64,
    pub total_events: i64,
    pub total_links: i64,
    pub active_links: i64,
    pub inactive_links: i64,
    pub links: Vec<LinkStatsItem>,
    pub recent_clicks: Vec<RecentClickItem>,
    pub daily_clicks: Vec<DailyClicksItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatsItem {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub click_count: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClickItem {
    pub id: i64,
    pub link_id: i64,
    /// `null` when the link no longer exists.
    pub link: Option<LinkSummary>,
    #[serde(flatten)]
    pub attribution: AttributionContext,
    pub clicked_at: DateTime<Utc>,
    pub meta_capi_attempted: bool,
    pub meta_capi_sent: bool,
    pub meta_capi_response: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct DailyClicksItem {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub clicks: i64,
}

impl From<Link> for LinkStatsItem {
    fn from(link: Link) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            click_count: link.click_count,
            is_active: link.is_active,
            created_at: link.created_at,
        }
    }
}

impl From<RecentClick> for RecentClickItem {
    fn from(recent: RecentClick) -> Self {
        let RecentClick { event, link } = recent;

        Self {
            id: event.id,
            link_id: event.link_id,
            link,
            meta_capi_attempted: event.dispatch.attempted(),
            meta_capi_sent: event.dispatch.succeeded(),
            meta_capi_response: event.dispatch.response().cloned(),
            attribution: event.attribution,
            clicked_at: event.clicked_at,
        }
    }
}

impl From<DailyClicks> for DailyClicksItem {
    fn from(day: DailyClicks) -> Self {
        Self {
            date: day.date.format("%Y-%m-%d").to_string(),
            clicks: day.clicks,
        }
    }
}

impl From<StatsSnapshot> for StatsData {
    fn from(s: StatsSnapshot) -> Self {
        Self {
            total_clicks: s.total_clicks,
            total_events: s.total_events,
            total_links: s.total_links,
            active_links: s.active_links,
            inactive_links: s.inactive_links,
            links: s.links.into_iter().map(Into::into).collect(),
            recent_clicks: s.recent_clicks.into_iter().map(Into::into).collect(),
            daily_clicks: s.daily_clicks.into_iter().map(Into::into).collect(),
        }
    }
}
