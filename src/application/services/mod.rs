//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_service;
pub mod link_service;
pub mod stats_service;

pub use auth_service::AuthService;
pub use click_service::{ClickService, TrackedClick};
pub use link_service::LinkService;
pub use stats_service::{DailyClicks, StatsService, StatsSnapshot};
