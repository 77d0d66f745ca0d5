//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod click;
pub mod health;
pub mod links;
pub mod stats;

pub use click::{click_handler, go_handler};
pub use health::health_handler;
pub use links::{create_link_handler, list_links_handler, update_link_handler};
pub use stats::stats_handler;
