//! Shared application state injected into every handler.

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Instant;

use crate::application::services::{AuthService, ClickService, LinkService, StatsService};
use crate::infrastructure::conversions::MetaCapiDispatcher;
use crate::infrastructure::persistence::{PgClickRepository, PgLinkRepository};

pub type AppClickService = ClickService<PgLinkRepository, PgClickRepository, MetaCapiDispatcher>;
pub type AppLinkService = LinkService<PgLinkRepository>;
pub type AppStatsService = StatsService<PgLinkRepository, PgClickRepository>;

/// Services and process metadata, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PgPool>,
    pub click_service: Arc<AppClickService>,
    pub link_service: Arc<AppLinkService>,
    pub stats_service: Arc<AppStatsService>,
    pub auth_service: Arc<AuthService>,
    pub environment: String,
    pub started_at: Instant,
}

impl AppState {
    /// Wires repositories and services over a shared pool.
    ///
    /// The click pipeline's dispatch timeout is taken from the dispatcher's
    /// own configuration.
    pub fn new(
        db: Arc<PgPool>,
        dispatcher: MetaCapiDispatcher,
        admin_token: Option<&str>,
        environment: impl Into<String>,
    ) -> Self {
        let link_repository = Arc::new(PgLinkRepository::new(db.clone()));
        let click_repository = Arc::new(PgClickRepository::new(db.clone()));
        let dispatch_timeout = dispatcher.config().timeout;

        let click_service = Arc::new(ClickService::new(
            link_repository.clone(),
            click_repository.clone(),
            Arc::new(dispatcher),
            dispatch_timeout,
        ));
        let link_service = Arc::new(LinkService::new(link_repository.clone()));
        let stats_service = Arc::new(StatsService::new(link_repository, click_repository));
        let auth_service = Arc::new(AuthService::new(admin_token));

        Self {
            db,
            click_service,
            link_service,
            stats_service,
            auth_service,
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }
}
