//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A curated redirect target with a click counter
//! - [`ClickEvent`] - An immutable record of one accepted click
//! - [`AttributionContext`] - Request-derived ad attribution signals
//! - [`DispatchOutcome`] - Stored result of the conversion dispatch
//!
//! # Design Pattern
//!
//! Entities come with separate input structs for creation and updates:
//! - `NewLink`, `NewClickEvent` - For creating new records
//! - `LinkPatch` - For partial updates

pub mod click;
pub mod link;

pub use click::{
    AttributionContext, ClickEvent, DispatchOutcome, LinkSummary, NewClickEvent, RecentClick,
};
pub use link::{Link, LinkPatch, NewLink};
