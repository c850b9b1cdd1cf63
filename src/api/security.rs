use crate::client::envelope::ApiEnvelope;
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::page::Page;
use crate::model::security::{SecurityEvent, SecurityStats};

pub struct SecurityApi<'a> {
    client: &'a ApiClient,
}

impl<'a> SecurityApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> ApiEnvelope<SecurityStats> {
        self.client.send(RequestSpec::get("/api/security/audit/stats")).await
    }

    pub async fn events(&self, page: u32, size: u32) -> ApiEnvelope<Page<SecurityEvent>> {
        self.client
            .send(
                RequestSpec::get("/api/security/audit/events")
                    .query("page", page)
                    .query("size", size),
            )
            .await
    }

    pub async fn clear_tracking(&self) -> ApiEnvelope<()> {
        self.client.send_unit(RequestSpec::delete("/api/security/tracking")).await
    }
}
