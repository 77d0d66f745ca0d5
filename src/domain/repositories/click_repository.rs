//! Repository trait for the click event log.

use crate::domain::entities::{ClickEvent, NewClickEvent, RecentClick};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for the append-only click event log.
///
/// There is no update or delete operation: events are immutable once written.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_click.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Persists a click event and returns it with its id and timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, event: NewClickEvent) -> Result<ClickEvent, AppError>;

    /// Returns the `limit` most recent events, newest first, joined with
    /// their link. Events whose link no longer exists have `link: None`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn query_recent(&self, limit: i64) -> Result<Vec<RecentClick>, AppError>;

    /// Returns events with `clicked_at >= start`, oldest first.
    ///
    /// There is no upper bound: `clicked_at` is stamped by the database
    /// clock, which may run ahead of the caller's.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn query_since(&self, start: DateTime<Utc>) -> Result<Vec<ClickEvent>, AppError>;

    /// Counts every event in the log.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_all(&self) -> Result<i64, AppError>;
}
