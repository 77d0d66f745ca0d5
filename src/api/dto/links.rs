//! DTOs for link administration endpoints.

use serde::Deserialize;
use validator::Validate;

use crate::domain::entities::LinkPatch;

/// Request body for `POST /links`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,

    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Position in the public list, lower first.
    #[serde(default, alias = "order")]
    pub display_order: i32,
}

/// Request body for `PATCH /links/{id}`.
///
/// All fields are optional and only provided fields are changed.
/// `description: null` clears the description. Unknown fields such as
/// `clickCount` are ignored.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: Option<String>,

    #[validate(url(message = "Invalid URL format"))]
    pub url: Option<String>,

    /// Absent = no change, null = clear, value = set.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,

    #[serde(alias = "order")]
    pub display_order: Option<i32>,

    pub is_active: Option<bool>,
}

impl From<UpdateLinkRequest> for LinkPatch {
    fn from(req: UpdateLinkRequest) -> Self {
        LinkPatch {
            title: req.title,
            url: req.url,
            description: req.description,
            display_order: req.display_order,
            is_active: req.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_description_states() {
        let absent: UpdateLinkRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.description, None);

        let cleared: UpdateLinkRequest =
            serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: UpdateLinkRequest =
            serde_json::from_str(r#"{"description": "Spring drop"}"#).unwrap();
        assert_eq!(set.description, Some(Some("Spring drop".to_string())));
    }

    #[test]
    fn test_update_request_ignores_click_count() {
        let req: UpdateLinkRequest =
            serde_json::from_str(r#"{"clickCount": 999, "isActive": false, "order": 3}"#).unwrap();
        let patch = LinkPatch::from(req);

        assert_eq!(patch.is_active, Some(false));
        assert_eq!(patch.display_order, Some(3));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"title": "", "url": "not-a-url"}"#).unwrap();
        let errors = req.validate().unwrap_err();

        assert!(errors.field_errors().contains_key("title"));
        assert!(errors.field_errors().contains_key("url"));
    }
}
