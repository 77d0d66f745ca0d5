//! Utility functions for request handling and input validation.
//!
//! - [`attribution`] - Attribution context extraction from HTTP headers
//! - [`target_url`] - Link target URL validation

pub mod attribution;
pub mod target_url;
