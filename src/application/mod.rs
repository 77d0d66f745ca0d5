//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! the conversion dispatcher, validation and business rules. Services consume
//! domain traits and provide a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::click_service::ClickService`] - Click pipeline and conversion dispatch
//! - [`services::stats_service::StatsService`] - Click analytics
//! - [`services::link_service::LinkService`] - Link administration
//! - [`services::auth_service::AuthService`] - Admin token authentication

pub mod services;
