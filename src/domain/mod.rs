//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`conversion`] - Conversion dispatch contract and its error type
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository and dispatcher traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Click Processing Flow
//!
//! 1. HTTP handler extracts an [`entities::AttributionContext`] from the request
//! 2. [`crate::application::services::ClickService`] looks up the active link
//! 3. A [`conversion::ConversionDispatcher`] sends one conversion event
//! 4. The click and its [`entities::DispatchOutcome`] are persisted via [`repositories::ClickRepository`]
//! 5. The link counter is incremented via [`repositories::LinkRepository`]

pub mod conversion;
pub mod entities;
pub mod repositories;
