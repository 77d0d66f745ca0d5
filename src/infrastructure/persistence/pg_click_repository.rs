//! PostgreSQL implementation of the click event log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::types::Json;
use std::sync::Arc;

use crate::domain::entities::{
    AttributionContext, ClickEvent, DispatchOutcome, LinkSummary, NewClickEvent, RecentClick,
};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct ClickRow {
    id: i64,
    link_id: i64,
    ip_address: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
    fbp: Option<String>,
    fbc: Option<String>,
    clicked_at: DateTime<Utc>,
    dispatch_attempted: bool,
    dispatch_succeeded: bool,
    dispatch_response: Option<Json<Value>>,
}

impl From<ClickRow> for ClickEvent {
    fn from(r: ClickRow) -> Self {
        ClickEvent {
            id: r.id,
            link_id: r.link_id,
            attribution: AttributionContext {
                ip_address: r.ip_address,
                user_agent: r.user_agent,
                referer: r.referer,
                fbp: r.fbp,
                fbc: r.fbc,
            },
            clicked_at: r.clicked_at,
            dispatch: DispatchOutcome::from_parts(
                r.dispatch_attempted,
                r.dispatch_succeeded,
                r.dispatch_response.map(|Json(v)| v),
            ),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecentClickRow {
    #[sqlx(flatten)]
    click: ClickRow,
    link_title: Option<String>,
    link_url: Option<String>,
}

impl From<RecentClickRow> for RecentClick {
    fn from(r: RecentClickRow) -> Self {
        let link = match (r.link_title, r.link_url) {
            (Some(title), Some(url)) => Some(LinkSummary {
                id: r.click.link_id,
                title,
                url,
            }),
            _ => None,
        };

        RecentClick {
            event: r.click.into(),
            link,
        }
    }
}

/// PostgreSQL repository for the append-only click event log.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn insert(&self, event: NewClickEvent) -> Result<ClickEvent, AppError> {
        let NewClickEvent {
            link_id,
            attribution,
            dispatch,
        } = event;

        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO click_events (
                link_id, ip_address, user_agent, referer, fbp, fbc,
                dispatch_attempted, dispatch_succeeded, dispatch_response
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, link_id, ip_address, user_agent, referer, fbp, fbc,
                      clicked_at, dispatch_attempted, dispatch_succeeded, dispatch_response
            "#,
        )
        .bind(link_id)
        .bind(attribution.ip_address)
        .bind(attribution.user_agent)
        .bind(attribution.referer)
        .bind(attribution.fbp)
        .bind(attribution.fbc)
        .bind(dispatch.attempted())
        .bind(dispatch.succeeded())
        .bind(dispatch.response().cloned().map(Json))
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn query_recent(&self, limit: i64) -> Result<Vec<RecentClick>, AppError> {
        let rows = sqlx::query_as::<_, RecentClickRow>(
            r#"
            SELECT
                c.id, c.link_id, c.ip_address, c.user_agent, c.referer, c.fbp, c.fbc,
                c.clicked_at, c.dispatch_attempted, c.dispatch_succeeded, c.dispatch_response,
                l.title AS link_title,
                l.url AS link_url
            FROM click_events c
            LEFT JOIN links l ON l.id = c.link_id
            ORDER BY c.clicked_at DESC, c.id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(RecentClick::from).collect())
    }

    async fn query_since(&self, start: DateTime<Utc>) -> Result<Vec<ClickEvent>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, link_id, ip_address, user_agent, referer, fbp, fbc,
                   clicked_at, dispatch_attempted, dispatch_succeeded, dispatch_response
            FROM click_events
            WHERE clicked_at >= $1
            ORDER BY clicked_at ASC, id ASC
            "#,
        )
        .bind(start)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ClickEvent::from).collect())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM click_events")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
