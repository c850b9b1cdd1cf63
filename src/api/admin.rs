use crate::client::envelope::ApiEnvelope;
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::admin::{AdminCommentQuery, AdminPostQuery, AdminStats, AdminUser, AdminUserQuery, AdminUserSummary};
use crate::model::comment::AdminComment;
use crate::model::page::Page;
use crate::model::post::PostRecord;

/// `/api/admin/*`; the backend requires the ADMIN role.
pub struct AdminApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiEnvelope<AdminStats> {
        self.client.send(RequestSpec::get("/api/admin/stats")).await
    }

    pub async fn posts(&self, query: &AdminPostQuery) -> ApiEnvelope<Page<PostRecord>> {
        let mut spec = paged("/api/admin/posts", query.page, query.size)
            .query_opt("sort", query.sort.map(|sort| sort.as_str()))
            .query_opt("order", query.order)
            .query_opt("author", query.author.as_deref());
        for tag in &query.tags {
            spec = spec.query("tags", tag);
        }
        self.client
            .send(spec.query_opt("search", query.search.as_deref()))
            .await
    }

    pub async fn post(&self, post_id: i64) -> ApiEnvelope<PostRecord> {
        self.client
            .send(RequestSpec::get(format!("/api/admin/posts/{}", post_id)))
            .await
    }

    pub async fn delete_post(&self, post_id: i64) -> ApiEnvelope<()> {
        self.client
            .send_unit(RequestSpec::delete(format!("/api/admin/posts/{}", post_id)))
            .await
    }

    pub async fn users(&self, query: &AdminUserQuery) -> ApiEnvelope<Page<AdminUser>> {
        let spec = paged("/api/admin/users", query.page, query.size)
            .query_opt("sort", query.sort.as_deref())
            .query_opt("order", query.order)
            .query_opt("search", query.search.as_deref());
        self.client.send(spec).await
    }

    pub async fn user_summary(&self, user_id: &str) -> ApiEnvelope<AdminUserSummary> {
        self.client
            .send(RequestSpec::get(format!("/api/admin/users/{}/summary", user_id)))
            .await
    }

    pub async fn comments(&self, query: &AdminCommentQuery) -> ApiEnvelope<Page<AdminComment>> {
        let spec = paged("/api/admin/comments", query.page, query.size)
            .query_opt("sort", query.sort.as_deref())
            .query_opt("order", query.order)
            .query_opt("search", query.search.as_deref())
            .query_opt("postId", query.post_id)
            .query_opt("author", query.author.as_deref());
        self.client.send(spec).await
    }

    pub async fn comment(&self, comment_id: &str) -> ApiEnvelope<AdminComment> {
        self.client
            .send(RequestSpec::get(format!("/api/admin/comments/{}", comment_id)))
            .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> ApiEnvelope<()> {
        self.client
            .send_unit(RequestSpec::delete(format!("/api/admin/comments/{}", comment_id)))
            .await
    }
}

fn paged(path: &str, page: u32, size: u32) -> RequestSpec {
    RequestSpec::get(path).query("page", page).query("size", size)
}
