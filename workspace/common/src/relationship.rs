use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the viewer and another member relate through follow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    /// Both follow each other.
    Mutual,
    /// The viewer follows the other member.
    Following,
    /// The other member follows the viewer.
    Follower,
    None,
}

impl RelationshipType {
    pub fn from_flags(is_following: bool, is_following_back: bool) -> Self {
        match (is_following, is_following_back) {
            (true, true) => RelationshipType::Mutual,
            (true, false) => RelationshipType::Following,
            (false, true) => RelationshipType::Follower,
            (false, false) => RelationshipType::None,
        }
    }
}
