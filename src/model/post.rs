use std::fmt;

use serde::{Deserialize, Serialize};

use crate::helpers::serde::{opt_i64, string_or_number};
use crate::utils::constants::UNKNOWN_AUTHOR;

/// `author` is a bare name on profile views and `{username}` on GraphQL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AuthorField {
    Name(String),
    User { username: Option<String> },
}

/// `tags` is `string[]` on REST views and `{name}[]` on GraphQL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TagField {
    Name(String),
    Tag { name: String },
}

impl TagField {
    pub fn name(&self) -> &str {
        match self {
            TagField::Name(name) | TagField::Tag { name } => name,
        }
    }
}

/// A post as served by any of the list, detail, profile or GraphQL views.
///
/// Fields are kept as received; use the accessors rather than the raw
/// fields so every caller resolves the variants in the same order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(default, deserialize_with = "opt_i64")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    pub excerpt: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub author: Option<AuthorField>,
    pub tags: Option<Vec<TagField>>,
    pub created_at: Option<String>,
    pub posted_at: Option<String>,
    pub updated_at: Option<String>,
    pub last_updated: Option<String>,
    pub comments_count: Option<u64>,
    pub total_comments: Option<u64>,
}

impl PostRecord {
    /// `author.username`, then `authorName`, then a bare `author`, then "Unknown".
    pub fn author_name(&self) -> &str {
        let nested = match &self.author {
            Some(AuthorField::User { username }) => username.as_deref(),
            _ => None,
        };
        let bare = match &self.author {
            Some(AuthorField::Name(name)) => Some(name.as_str()),
            _ => None,
        };

        [nested, self.author_name.as_deref(), bare]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|tag| tag.name().to_owned())
            .collect()
    }

    /// `createdAt`, then `postedAt`, then `updatedAt`, then `lastUpdated`.
    pub fn created_at(&self) -> Option<&str> {
        first_present(&[
            &self.created_at,
            &self.posted_at,
            &self.updated_at,
            &self.last_updated,
        ])
    }

    pub fn updated_at(&self) -> Option<&str> {
        first_present(&[&self.updated_at, &self.last_updated])
    }

    pub fn comment_count(&self) -> u64 {
        self.comments_count.or(self.total_comments).unwrap_or(0)
    }
}

fn first_present<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .filter_map(Option::as_deref)
        .find(|value| !value.is_empty())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub author_id: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSort {
    Id,
    CreatedAt,
    LastUpdated,
    UpdatedAt,
    Title,
}

impl PostSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostSort::Id => "id",
            PostSort::CreatedAt => "createdAt",
            PostSort::LastUpdated => "lastUpdated",
            PostSort::UpdatedAt => "updatedAt",
            PostSort::Title => "title",
        }
    }

    /// GraphQL knows the last-modified field only as `updatedAt`.
    pub fn graphql_field(&self) -> &'static str {
        match self {
            PostSort::LastUpdated => PostSort::UpdatedAt.as_str(),
            other => other.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Filters for the public post listing.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub page: u32,
    pub size: u32,
    pub sort: Option<PostSort>,
    pub order: Option<SortOrder>,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub search: Option<String>,
}

impl Default for PostQuery {
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
