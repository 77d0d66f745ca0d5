//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and the conversion API.
//!
//! # Modules
//!
//! - [`conversions`] - Meta Conversions API client
//! - [`persistence`] - PostgreSQL repository implementations

pub mod conversions;
pub mod persistence;
