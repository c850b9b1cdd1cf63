use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::client::envelope::{ApiEnvelope, ApiResponse};
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::page::Page;
use crate::model::post::{CreatePostRequest, PostQuery, PostRecord, PostSort, SortOrder, UpdatePostRequest};

const GET_ALL_POSTS: &str = r#"
query GetAllPosts($page: Int!, $size: Int!, $sortBy: String!, $sortDirection: String!, $author: String, $tags: [String!], $search: String) {
  getAllPosts(page: $page, size: $size, sortBy: $sortBy, sortDirection: $sortDirection, author: $author, tags: $tags, search: $search) {
    content {
      id
      title
      updatedAt
      tags { name }
      totalComments
      author { username }
    }
    pageNumber
    pageSize
    totalElements
    totalPages
    last
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetAllPosts {
    get_all_posts: Page<PostRecord>,
}

pub struct PostsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PostsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Public listing through GraphQL `getAllPosts`.
    pub async fn list(&self, query: &PostQuery) -> ApiEnvelope<Page<PostRecord>> {
        let response = self
            .client
            .graphql::<GetAllPosts>(GET_ALL_POSTS, list_variables(query))
            .await?;
        Ok(ApiResponse::with_message(
            "Posts loaded successfully",
            response.data.get_all_posts,
        ))
    }

    pub async fn get(&self, post_id: i64) -> ApiEnvelope<PostRecord> {
        self.client
            .send(RequestSpec::get(format!("/api/posts/{}", post_id)))
            .await
    }

    pub async fn create(&self, request: &CreatePostRequest) -> ApiEnvelope<PostRecord> {
        self.client
            .send(RequestSpec::post("/api/posts").json(request))
            .await
    }

    pub async fn update(&self, post_id: i64, request: &UpdatePostRequest) -> ApiEnvelope<PostRecord> {
        self.client
            .send(RequestSpec::put(format!("/api/posts/{}", post_id)).json(request))
            .await
    }

    pub async fn delete(&self, post_id: i64) -> ApiEnvelope<()> {
        self.client
            .send_unit(RequestSpec::delete(format!("/api/posts/{}", post_id)))
            .await
    }
}

/// Optional filters are omitted rather than sent as null; empty tags are omitted too.
fn list_variables(query: &PostQuery) -> Value {
    let mut variables = Map::new();
    variables.insert("page".into(), json!(query.page));
    variables.insert("size".into(), json!(query.size));
    variables.insert(
        "sortBy".into(),
        json!(query.sort.unwrap_or(PostSort::UpdatedAt).graphql_field()),
    );
    variables.insert(
        "sortDirection".into(),
        json!(query.order.unwrap_or(SortOrder::Desc).to_string()),
    );
    if let Some(author) = query.author.as_deref().filter(|a| !a.is_empty()) {
        variables.insert("author".into(), json!(author));
    }
    if !query.tags.is_empty() {
        variables.insert("tags".into(), json!(query.tags));
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        variables.insert("search".into(), json!(search));
    }
    Value::Object(variables)
}
