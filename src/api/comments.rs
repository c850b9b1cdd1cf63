use serde_json::json;

use crate::client::envelope::ApiEnvelope;
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::comment::{CommentRecord, CreateCommentRequest};

pub struct CommentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommentsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_post(&self, post_id: i64) -> ApiEnvelope<Vec<CommentRecord>> {
        self.client
            .send(RequestSpec::get(format!("/api/comments/post/{}", post_id)))
            .await
    }

    pub async fn get(&self, comment_id: &str) -> ApiEnvelope<CommentRecord> {
        self.client
            .send(RequestSpec::get(format!("/api/comments/{}", comment_id)))
            .await
    }

    pub async fn create(&self, request: &CreateCommentRequest) -> ApiEnvelope<CommentRecord> {
        self.client
            .send(RequestSpec::post("/api/comments").json(request))
            .await
    }

    /// The backend checks ownership against the post, so the id travels in the body.
    pub async fn delete(&self, comment_id: &str, post_id: i64) -> ApiEnvelope<()> {
        self.client
            .send_unit(
                RequestSpec::delete(format!("/api/comments/{}", comment_id)).json(&json!({ "postId": post_id })),
            )
            .await
    }
}
