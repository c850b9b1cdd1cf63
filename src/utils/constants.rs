//! Shared constants and invariants

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_GRAPHQL_PATH: &str = "/graphql";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_EXPIRY_LEAD_SECS: u64 = 30;
pub const DEFAULT_CONFIG_PATH: &str = "devblog-client.yaml";

// Persisted session keys
pub const TOKEN_KEY: &str = "devblog_token";
pub const USER_ID_KEY: &str = "devblog_user_id";
pub const USER_KEY: &str = "devblog_user";

// Backend endpoints handled by the pipeline itself
pub const AUTH_PATH_PREFIX: &str = "/api/auth/";
pub const REFRESH_TOKEN_PATH: &str = "/api/auth/refresh-token";

// Fallback messages
pub const SUCCESS_STATUS: &str = "success";
pub const ERROR_STATUS: &str = "error";
pub const SUCCESS_MESSAGE: &str = "Request successful";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";
pub const REFRESH_FAILED_MESSAGE: &str = "Token refresh failed";
pub const GRAPHQL_ERROR_MESSAGE: &str = "GraphQL error";
pub const GRAPHQL_FAILED_MESSAGE: &str = "GraphQL request failed";
pub const UNKNOWN_AUTHOR: &str = "Unknown";
