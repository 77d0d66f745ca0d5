//! Click analytics: totals, per-link breakdown, recent activity and daily histogram.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::entities::{ClickEvent, Link, RecentClick};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Number of events returned in [`StatsSnapshot::recent_clicks`].
pub const RECENT_CLICKS_LIMIT: i64 = 10;

/// Length of the daily histogram window, in days.
pub const DAILY_WINDOW_DAYS: i64 = 7;

/// Clicks recorded on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyClicks {
    pub date: NaiveDate,
    pub clicks: i64,
}

/// Point-in-time analytics view.
///
/// Computed from independent reads with no freshness guarantee against
/// concurrent clicks.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Sum of link counters. May trail `total_events` if a counter update failed.
    pub total_clicks: i64,
    /// Number of rows in the click event log.
    pub total_events: i64,
    pub total_links: i64,
    pub active_links: i64,
    pub inactive_links: i64,
    /// All links, highest click count first.
    pub links: Vec<Link>,
    pub recent_clicks: Vec<RecentClick>,
    /// Days with at least one click, oldest first.
    pub daily_clicks: Vec<DailyClicks>,
}

/// Service for computing click analytics.
pub struct StatsService<L: LinkRepository, C: ClickRepository> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
}

impl<L: LinkRepository, C: ClickRepository> StatsService<L, C> {
    /// Creates a new statistics service.
    pub fn new(link_repository: Arc<L>, click_repository: Arc<C>) -> Self {
        Self {
            link_repository,
            click_repository,
        }
    }

    /// Computes a snapshot relative to the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn compute_stats(&self) -> Result<StatsSnapshot, AppError> {
        self.compute_stats_at(Utc::now()).await
    }

    /// Computes a snapshot with the daily window ending at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn compute_stats_at(&self, now: DateTime<Utc>) -> Result<StatsSnapshot, AppError> {
        let window_start = now - Duration::days(DAILY_WINDOW_DAYS);

        let (mut links, total_events, recent_clicks, window_events) = tokio::try_join!(
            self.link_repository.list_all(),
            self.click_repository.count_all(),
            self.click_repository.query_recent(RECENT_CLICKS_LIMIT),
            self.click_repository.query_since(window_start),
        )?;

        links.sort_by(|a, b| b.click_count.cmp(&a.click_count).then(a.id.cmp(&b.id)));

        let total_clicks = links.iter().map(|l| l.click_count).sum();
        let active_links = links.iter().filter(|l| l.is_active).count() as i64;
        let total_links = links.len() as i64;

        Ok(StatsSnapshot {
            total_clicks,
            total_events,
            total_links,
            active_links,
            inactive_links: total_links - active_links,
            links,
            recent_clicks,
            daily_clicks: daily_clicks(&window_events, now),
        })
    }
}

/// Buckets events from the last [`DAILY_WINDOW_DAYS`] days by UTC date.
///
/// Events older than `now - window` are ignored. Events stamped after `now`
/// still count, since the database clock may be ahead. Empty days are omitted.
pub fn daily_clicks(events: &[ClickEvent], now: DateTime<Utc>) -> Vec<DailyClicks> {
    let window_start = now - Duration::days(DAILY_WINDOW_DAYS);

    let mut buckets: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for event in events
        .iter()
        .filter(|e| e.clicked_at >= window_start)
    {
        *buckets.entry(event.clicked_at.date_naive()).or_default() += 1;
    }

    buckets
        .into_iter()
        .map(|(date, clicks)| DailyClicks { date, clicks })
        .collect()
}
