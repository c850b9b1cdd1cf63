//! # DevBlog Client Library
//!
//! Authenticated HTTP client for the DevBlog backend: every REST and GraphQL
//! call goes through one request pipeline that attaches the bearer token,
//! refreshes it (at most one refresh in flight at a time), retries once on
//! `401` and normalizes every response into a single envelope shape.
//!
//! Modules:
//! - `config`: client configuration (YAML), loading and validation
//! - `session`: persisted access token, session user and key-value storage
//! - `refresh`: single-flight refresh coordinator
//! - `client`: request pipeline, envelopes and response normalization
//! - `model`: backend entities and field reconciliation accessors
//! - `api`: typed operations over the backend REST/GraphQL surface

pub mod api;
pub mod client;
pub mod config;
pub mod helpers;
pub mod model;
pub mod observability;
pub mod refresh;
pub mod session;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::client::envelope::{ApiEnvelope, ApiError, ApiResponse};
pub use crate::client::pipeline::ApiClient;
pub use crate::client::request::RequestSpec;
pub use crate::config::settings::ClientConfig;
pub use crate::session::token::AccessToken;
pub use crate::session::token_store::TokenStore;
