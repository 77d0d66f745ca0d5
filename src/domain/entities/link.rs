//! Link entity representing a curated outbound redirect target.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A managed redirect target with display metadata and a click counter.
///
/// `click_count` is a cached value derived from the click event log. It is
/// only ever incremented atomically by the store, never written back from
/// application code.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: i64,
        title: String,
        url: String,
        description: Option<String>,
        display_order: i32,
        is_active: bool,
        click_count: i64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            url,
            description,
            display_order,
            is_active,
            click_count,
            created_at,
            updated_at,
        }
    }
}

/// Input data for creating a new link. New links are active with a zero counter.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub display_order: i32,
}

/// Partial update for an existing link.
///
/// `None` fields are left unchanged. `description: Some(None)` clears the
/// description. The click counter is deliberately absent.
#[derive(Debug, Clone, Default)]
pub struct LinkPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<Option<String>>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

impl LinkPatch {
    /// Returns true if the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.display_order.is_none()
            && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_link() -> Link {
        let now = Utc::now();
        Link::new(
            1,
            "Portfolio".to_string(),
            "https://example.com".to_string(),
            None,
            0,
            true,
            5,
            now,
            now,
        )
    }

    #[test]
    fn test_link_creation() {
        let link = sample_link();

        assert_eq!(link.id, 1);
        assert_eq!(link.title, "Portfolio");
        assert_eq!(link.url, "https://example.com");
        assert!(link.is_active);
        assert_eq!(link.click_count, 5);
    }

    #[test]
    fn test_link_serializes_camel_case() {
        let json = serde_json::to_value(sample_link()).unwrap();

        assert_eq!(json["clickCount"], 5);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["displayOrder"], 0);
        assert!(json.get("click_count").is_none());
    }

    #[test]
    fn test_link_patch_is_empty() {
        assert!(LinkPatch::default().is_empty());

        let patch = LinkPatch {
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!patch.is_empty());

        let clear_description = LinkPatch {
            description: Some(None),
            ..Default::default()
        };
        assert!(!clear_description.is_empty());
    }
}
