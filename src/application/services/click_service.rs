//! Click tracking pipeline: lookup, conversion dispatch, durable record, counter.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::conversion::{ConversionDispatcher, DispatchError};
use crate::domain::entities::{AttributionContext, ClickEvent, DispatchOutcome, Link, NewClickEvent};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Result of a successfully tracked click.
#[derive(Debug, Clone)]
pub struct TrackedClick {
    /// The link as it was read before the counter increment.
    pub link: Link,
    /// The persisted click event.
    pub event: ClickEvent,
    /// Counter value after this click, computed from the value read at lookup.
    pub click_count: i64,
}

impl TrackedClick {
    pub fn redirect_url(&self) -> &str {
        &self.link.url
    }

    pub fn dispatch_succeeded(&self) -> bool {
        self.event.dispatch.succeeded()
    }
}

/// Orchestrates a single click from lookup to redirect target.
///
/// # Pipeline
///
/// 1. Look up the active link; unknown or inactive links fail with
///    [`AppError::NotFound`] and leave no trace
/// 2. Send one conversion event, bounded by `dispatch_timeout`; any failure
///    becomes a [`DispatchOutcome`] value
/// 3. Persist the click event; failure here fails the request with
///    [`AppError::Internal`]
/// 4. Increment the link counter; failure here is logged and ignored, the
///    event log stays the source of truth
///
/// Dispatch always happens before the write, so the stored outcome reflects
/// exactly what was attempted.
pub struct ClickService<L: LinkRepository, C: ClickRepository, D: ConversionDispatcher> {
    link_repository: Arc<L>,
    click_repository: Arc<C>,
    dispatcher: Arc<D>,
    dispatch_timeout: Duration,
}

impl<L: LinkRepository, C: ClickRepository, D: ConversionDispatcher> ClickService<L, C, D> {
    /// Creates a new click service.
    ///
    /// `dispatch_timeout` caps how long a click waits on the conversion API.
    pub fn new(
        link_repository: Arc<L>,
        click_repository: Arc<C>,
        dispatcher: Arc<D>,
        dispatch_timeout: Duration,
    ) -> Self {
        Self {
            link_repository,
            click_repository,
            dispatcher,
            dispatch_timeout,
        }
    }

    /// Returns true if conversion events will actually be sent.
    pub fn conversions_enabled(&self) -> bool {
        self.dispatcher.is_enabled()
    }

    /// Tracks one click on `link_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not exist or is inactive.
    /// Returns [`AppError::Internal`] if the lookup or the click event write fails.
    pub async fn track_click(
        &self,
        link_id: i64,
        attribution: AttributionContext,
    ) -> Result<TrackedClick, AppError> {
        let Some(link) = self.link_repository.find_active_by_id(link_id).await? else {
            counter!("clicks_rejected_total").increment(1);
            debug!(link_id, "Click on unknown or inactive link");
            return Err(AppError::not_found(
                "Link not found or inactive",
                json!({ "link_id": link_id }),
            ));
        };

        let dispatch = self.dispatch(&attribution, link_id).await;

        let new_event = NewClickEvent {
            link_id,
            attribution,
            dispatch,
        };

        let event = self
            .click_repository
            .insert(new_event)
            .await
            .map_err(|e| {
                error!(link_id, error = %e, "Failed to record click event");
                AppError::internal("Failed to track click", json!({ "link_id": link_id }))
            })?;

        match self.link_repository.increment_click_count(link_id).await {
            Ok(true) => {}
            Ok(false) => warn!(link_id, "Link disappeared before its click counter was updated"),
            Err(e) => warn!(link_id, error = %e, "Failed to increment click counter"),
        }

        counter!("clicks_tracked_total").increment(1);
        info!(
            link_id,
            event_id = event.id,
            dispatched = event.dispatch.succeeded(),
            "Click tracked"
        );

        let click_count = link.click_count + 1;
        Ok(TrackedClick {
            link,
            event,
            click_count,
        })
    }

    /// Sends the conversion event and folds every failure into the outcome.
    async fn dispatch(&self, attribution: &AttributionContext, link_id: i64) -> DispatchOutcome {
        let result = tokio::time::timeout(
            self.dispatch_timeout,
            self.dispatcher.dispatch(attribution, link_id),
        )
        .await
        .unwrap_or(Err(DispatchError::Timeout));

        match result {
            Ok(response) => {
                counter!("conversion_dispatch_total", "outcome" => "sent").increment(1);
                DispatchOutcome::delivered(response)
            }
            Err(e) if !e.was_attempted() => {
                counter!("conversion_dispatch_total", "outcome" => "skipped").increment(1);
                debug!(link_id, reason = %e, "Conversion dispatch skipped");
                DispatchOutcome::not_attempted()
            }
            Err(e) => {
                counter!("conversion_dispatch_total", "outcome" => "failed").increment(1);
                warn!(link_id, error = %e, "Conversion dispatch failed");
                DispatchOutcome::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversion::MockConversionDispatcher;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::Value;

    fn create_test_link(id: i64, url: &str, click_count: i64) -> Link {
        let now = Utc::now();
        Link::new(
            id,
            "Shop".to_string(),
            url.to_string(),
            None,
            0,
            true,
            click_count,
            now,
            now,
        )
    }

    fn stored(event: NewClickEvent) -> ClickEvent {
        ClickEvent {
            id: 1,
            link_id: event.link_id,
            attribution: event.attribution,
            clicked_at: Utc::now(),
            dispatch: event.dispatch,
        }
    }

    fn service(
        links: MockLinkRepository,
        clicks: MockClickRepository,
        dispatcher: MockConversionDispatcher,
    ) -> ClickService<MockLinkRepository, MockClickRepository, MockConversionDispatcher> {
        ClickService::new(
            Arc::new(links),
            Arc::new(clicks),
            Arc::new(dispatcher),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_track_click_dispatch_failure_still_succeeds() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        let link = create_test_link(1, "https://example.com", 5);
        links
            .expect_find_active_by_id()
            .withf(|id| *id == 1)
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        dispatcher
            .expect_dispatch()
            .times(1)
            .returning(|_, _| Err(DispatchError::Transport("connection refused".to_string())));

        clicks
            .expect_insert()
            .withf(|event| {
                event.link_id == 1
                    && event.dispatch.attempted()
                    && !event.dispatch.succeeded()
                    && event.dispatch.response().is_some_and(|r| r.get("error").is_some())
            })
            .times(1)
            .returning(|event| Ok(stored(event)));

        links
            .expect_increment_click_count()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(true));

        let result = service(links, clicks, dispatcher)
            .track_click(1, AttributionContext::default())
            .await;

        let tracked = result.unwrap();
        assert_eq!(tracked.redirect_url(), "https://example.com");
        assert!(!tracked.dispatch_succeeded());
        assert_eq!(tracked.click_count, 6);
    }

    #[tokio::test]
    async fn test_track_click_dispatch_success() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        let link = create_test_link(2, "https://example.com/shop", 0);
        links
            .expect_find_active_by_id()
            .returning(move |_| Ok(Some(link.clone())));

        dispatcher
            .expect_dispatch()
            .withf(|ctx, link_id| *link_id == 2 && ctx.fbp.as_deref() == Some("abc123"))
            .times(1)
            .returning(|_, _| Ok(json!({ "events_received": 1 })));

        clicks
            .expect_insert()
            .withf(|event| event.dispatch.succeeded())
            .times(1)
            .returning(|event| Ok(stored(event)));

        links
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(true));

        let attribution = AttributionContext {
            fbp: Some("abc123".to_string()),
            ..Default::default()
        };

        let tracked = service(links, clicks, dispatcher)
            .track_click(2, attribution)
            .await
            .unwrap();

        assert!(tracked.dispatch_succeeded());
        assert_eq!(tracked.click_count, 1);
        assert_eq!(
            tracked.event.dispatch.response(),
            Some(&json!({ "events_received": 1 }))
        );
    }

    #[tokio::test]
    async fn test_track_click_missing_link_has_no_side_effects() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        links
            .expect_find_active_by_id()
            .times(1)
            .returning(|_| Ok(None));
        dispatcher.expect_dispatch().never();
        clicks.expect_insert().never();
        links.expect_increment_click_count().never();

        let result = service(links, clicks, dispatcher)
            .track_click(404, AttributionContext::default())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_track_click_persistence_failure_is_internal() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        let link = create_test_link(3, "https://example.com", 0);
        links
            .expect_find_active_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        dispatcher
            .expect_dispatch()
            .returning(|_, _| Ok(json!({})));
        clicks
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        links.expect_increment_click_count().never();

        let result = service(links, clicks, dispatcher)
            .track_click(3, AttributionContext::default())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_track_click_counter_failure_is_absorbed() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        let link = create_test_link(4, "https://example.com", 9);
        links
            .expect_find_active_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        dispatcher
            .expect_dispatch()
            .returning(|_, _| Ok(json!({})));
        clicks
            .expect_insert()
            .times(1)
            .returning(|event| Ok(stored(event)));
        links
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let tracked = service(links, clicks, dispatcher)
            .track_click(4, AttributionContext::default())
            .await
            .unwrap();

        assert_eq!(tracked.click_count, 10);
    }

    #[tokio::test]
    async fn test_track_click_missing_credentials_records_not_attempted() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();
        let mut dispatcher = MockConversionDispatcher::new();

        let link = create_test_link(5, "https://example.com", 0);
        links
            .expect_find_active_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        dispatcher
            .expect_dispatch()
            .returning(|_, _| Err(DispatchError::MissingCredentials));
        clicks
            .expect_insert()
            .withf(|event| event.dispatch == DispatchOutcome::not_attempted())
            .times(1)
            .returning(|event| Ok(stored(event)));
        links
            .expect_increment_click_count()
            .returning(|_| Ok(true));

        let tracked = service(links, clicks, dispatcher)
            .track_click(5, AttributionContext::default())
            .await
            .unwrap();

        assert!(!tracked.dispatch_succeeded());
        assert!(!tracked.event.dispatch.attempted());
    }

    struct StalledDispatcher;

    #[async_trait]
    impl ConversionDispatcher for StalledDispatcher {
        async fn dispatch(
            &self,
            _context: &AttributionContext,
            _link_id: i64,
        ) -> Result<Value, DispatchError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(json!({}))
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_track_click_dispatch_timeout_is_recorded() {
        let mut links = MockLinkRepository::new();
        let mut clicks = MockClickRepository::new();

        let link = create_test_link(6, "https://example.com", 0);
        links
            .expect_find_active_by_id()
            .returning(move |_| Ok(Some(link.clone())));
        clicks
            .expect_insert()
            .withf(|event| {
                event.dispatch.attempted()
                    && event.dispatch.response()
                        == Some(&json!({ "error": "conversion API request timed out" }))
            })
            .times(1)
            .returning(|event| Ok(stored(event)));
        links
            .expect_increment_click_count()
            .returning(|_| Ok(true));

        let service = ClickService::new(
            Arc::new(links),
            Arc::new(clicks),
            Arc::new(StalledDispatcher),
            Duration::from_millis(20),
        );

        let tracked = service
            .track_click(6, AttributionContext::default())
            .await
            .unwrap();

        assert!(!tracked.dispatch_succeeded());
    }
}
