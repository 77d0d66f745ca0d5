//! Outbound conversion event clients.
//!
//! - [`MetaCapiDispatcher`] - Meta Conversions API implementation of
//!   [`crate::domain::conversion::ConversionDispatcher`]

pub mod meta_capi;

pub use meta_capi::{ConversionConfig, MetaCapiDispatcher};
