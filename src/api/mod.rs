//! Typed accessors over [`ApiClient`], one per backend area.

pub mod admin;
pub mod auth;
pub mod comments;
pub mod metrics;
pub mod posts;
pub mod security;
pub mod tags;

use crate::client::pipeline::ApiClient;

impl ApiClient {
    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    pub fn posts(&self) -> posts::PostsApi<'_> {
        posts::PostsApi::new(self)
    }

    pub fn comments(&self) -> comments::CommentsApi<'_> {
        comments::CommentsApi::new(self)
    }

    pub fn tags(&self) -> tags::TagsApi<'_> {
        tags::TagsApi::new(self)
    }

    pub fn admin(&self) -> admin::AdminApi<'_> {
        admin::AdminApi::new(self)
    }

    pub fn metrics(&self) -> metrics::MetricsApi<'_> {
        metrics::MetricsApi::new(self)
    }

    pub fn security(&self) -> security::SecurityApi<'_> {
        security::SecurityApi::new(self)
    }
}
