//! Common transport-layer types shared between the backend and its clients.
//! Every JSON body the API returns is an [`ApiResponse`]; listings also carry a
//! [`PaginationMeta`].

mod pagination;
mod relationship;

pub use pagination::{PageRequest, PaginationMeta, DEFAULT_PAGE_LIMIT};
pub use relationship::RelationshipType;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Uniform response envelope: `{success, message?, data?, meta?}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Success flag
    pub success: bool,
    /// Human readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata for listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            meta: None,
        }
    }

    pub fn page(data: T, meta: PaginationMeta, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            meta: Some(meta),
        }
    }
}

/// Which of a profile's post collections to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    /// Regular posts authored by the profile owner.
    #[default]
    Posts,
    /// Posts the owner bookmarked. Only the owner may list them.
    Saved,
    /// Magazine posts; brand accounts only.
    Magazine,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Posts => "posts",
            PostKind::Saved => "saved",
            PostKind::Magazine => "magazine",
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown post kind: {0}")]
pub struct UnknownPostKind(pub String);

impl FromStr for PostKind {
    type Err = UnknownPostKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "posts" => Ok(PostKind::Posts),
            "saved" => Ok(PostKind::Saved),
            "magazine" => Ok(PostKind::Magazine),
            other => Err(UnknownPostKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_kind_parsing() {
        assert_eq!("posts".parse::<PostKind>(), Ok(PostKind::Posts));
        assert_eq!("saved".parse::<PostKind>(), Ok(PostKind::Saved));
        assert_eq!("magazine".parse::<PostKind>(), Ok(PostKind::Magazine));
        assert!("Posts".parse::<PostKind>().is_err());
        assert!("drafts".parse::<PostKind>().is_err());
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let response: ApiResponse<()> = ApiResponse {
            success: false,
            message: Some("nope".to_string()),
            data: None,
            meta: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn test_envelope_with_meta() {
        let meta = PaginationMeta::new(PostKind::Posts, 3, 12, 25);
        let response = ApiResponse::page(vec![1, 2, 3], meta, "ok");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["totalPages"], 3);
        assert_eq!(json["meta"]["type"], "posts");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }
}
