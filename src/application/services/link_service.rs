//! Link registry administration service.

use std::sync::Arc;

use crate::domain::entities::{Link, LinkPatch, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::target_url::validate_target_url;
use serde_json::json;

/// Service for listing, creating and editing links.
///
/// Target URLs are checked for an HTTP(S) scheme and a host before they
/// reach the store. The click counter is never writable from here.
pub struct LinkService<L: LinkRepository> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Lists active links in display order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_active_links(&self) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_active().await
    }

    /// Retrieves a link by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_link(&self, id: i64) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Creates a new active link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the title is blank or the URL is
    /// not an absolute HTTP(S) URL.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create_link(
        &self,
        title: String,
        url: String,
        description: Option<String>,
        display_order: i32,
    ) -> Result<Link, AppError> {
        let new_link = NewLink {
            title: clean_title(&title)?,
            url: clean_url(&url)?,
            description: clean_description(description),
            display_order,
        };

        self.link_repository.create(new_link).await
    }

    /// Applies a partial update to a link.
    ///
    /// An empty patch only bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a supplied title or URL is invalid.
    /// Returns [`AppError::NotFound`] if no link has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update_link(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let patch = LinkPatch {
            title: patch.title.as_deref().map(clean_title).transpose()?,
            url: patch.url.as_deref().map(clean_url).transpose()?,
            description: patch.description.map(clean_description),
            ..patch
        };

        self.link_repository.update(id, patch).await
    }
}

fn clean_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::bad_request(
            "Title is required",
            json!({ "field": "title" }),
        ));
    }
    Ok(title.to_string())
}

fn clean_url(url: &str) -> Result<String, AppError> {
    validate_target_url(url).map_err(|e| {
        AppError::bad_request(
            "Invalid URL format",
            json!({ "field": "url", "reason": e.to_string() }),
        )
    })
}

fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}
