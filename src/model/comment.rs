use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::helpers::serde::{opt_i64, string_or_number};
use crate::utils::constants::UNKNOWN_AUTHOR;

/// A comment from the public, profile or admin views.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "opt_i64")]
    pub post_id: Option<i64>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// Admin views add post and moderation details.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CommentRecord {
    pub fn author_name(&self) -> &str {
        [self.author_name.as_deref(), self.author.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }
}

pub type AdminComment = CommentRecord;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub comment_content: String,
    pub post_id: i64,
    pub author_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn author_name_falls_back_in_order() {
        let listed: CommentRecord =
            serde_json::from_value(json!({"id": "c1", "authorName": "bob", "author": "robert"})).unwrap();
        let profile: CommentRecord = serde_json::from_value(json!({"id": 9, "author": "bob"})).unwrap();
        let anonymous: CommentRecord = serde_json::from_value(json!({"id": "c3", "authorName": ""})).unwrap();

        assert_eq!(listed.author_name(), "bob");
        assert_eq!(profile.author_name(), "bob");
        assert_eq!(profile.id.as_deref(), Some("9"));
        assert_eq!(anonymous.author_name(), "Unknown");
    }

    #[test]
    fn admin_fields_are_preserved() {
        let comment: AdminComment = serde_json::from_value(json!({
            "id": "c1",
            "content": "nice",
            "postId": 4,
            "postTitle": "Lifetimes"
        }))
        .unwrap();

        assert_eq!(comment.post_id, Some(4));
        assert_eq!(comment.extra["postTitle"], "Lifetimes");
    }
}
