use serde::Deserialize;
use serde_json::{Map, Value};

use crate::helpers::serde::id_string;
use crate::model::post::{PostSort, SortOrder};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    #[serde(default, deserialize_with = "crate::helpers::serde::string_or_number")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub total_posts: u64,
    #[serde(default)]
    pub total_comments: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /api/admin/posts` filters. `tags` are sent as repeated parameters.
#[derive(Debug, Clone)]
pub struct AdminPostQuery {
    pub page: u32,
    pub size: u32,
    pub sort: Option<PostSort>,
    pub order: Option<SortOrder>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl Default for AdminPostQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: None,
            order: None,
            author: None,
            tags: Vec::new(),
            search: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminUserQuery {
    pub page: u32,
    pub size: u32,
    /// `id`, `createdAt` or `username`
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
}

impl Default for AdminUserQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: None,
            order: None,
            search: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminCommentQuery {
    pub page: u32,
    pub size: u32,
    /// `id` or `createdAt`
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
    pub post_id: Option<i64>,
    pub author: Option<String>,
}

impl Default for AdminCommentQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: None,
            order: None,
            search: None,
            post_id: None,
            author: None,
        }
    }
}
