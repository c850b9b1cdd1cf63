use serde::Deserialize;

use crate::helpers::serde::id_string;
use crate::model::comment::CommentRecord;
use crate::model::post::PostRecord;

/// `GET /api/users/profile`. Recent posts use the profile field names
/// (`author`, `postedAt`, `totalComments`), read them through the accessors.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(default)]
    pub recent_posts: Vec<PostRecord>,
    #[serde(default)]
    pub recent_comments: Vec<CommentRecord>,
}
