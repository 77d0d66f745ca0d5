//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements mapped through `FromRow` row types.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link registry and atomic click counter
//! - [`PgClickRepository`] - Click event log and analytics queries

pub mod pg_click_repository;
pub mod pg_link_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
