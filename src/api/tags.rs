use crate::client::envelope::ApiEnvelope;
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::tag::Tag;

pub struct TagsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> TagsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn popular(&self) -> ApiEnvelope<Vec<Tag>> {
        self.client.send(RequestSpec::get("/api/tags/popular")).await
    }
}
