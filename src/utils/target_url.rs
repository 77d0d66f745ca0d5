//! Validation of link target URLs.

use url::Url;

/// Reasons a link target URL is refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Returns the trimmed input unchanged on success: the stored target is
/// exactly what the administrator entered, so `https://example.com` does not
/// silently become `https://example.com/`.
///
/// # Errors
///
/// Returns [`TargetUrlError::InvalidFormat`] for malformed URLs,
/// [`TargetUrlError::UnsupportedProtocol`] for `javascript:`, `data:`,
/// `ftp:` and other non-HTTP(S) schemes, and [`TargetUrlError::MissingHost`]
/// when no host is present.
pub fn validate_target_url(input: &str) -> Result<String, TargetUrlError> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed).map_err(|e| TargetUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(TargetUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetUrlError::MissingHost);
    }

    Ok(trimmed.to_string())
}
