use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::helpers::time::now_rfc3339;
use crate::utils::constants::{
    ERROR_STATUS, GRAPHQL_ERROR_MESSAGE, NETWORK_ERROR_MESSAGE, REFRESH_FAILED_MESSAGE,
    SUCCESS_MESSAGE, SUCCESS_STATUS,
};

/// Successful backend call, unwrapped exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::with_message(SUCCESS_MESSAGE, data)
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: SUCCESS_STATUS.to_owned(),
            message: message.into(),
            data,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            status: self.status,
            message: self.message,
            data: f(self.data),
        }
    }
}

/// One entry of a GraphQL body-level `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Failed backend call, whatever the transport or the reason.
///
/// Serializes to the backend's own error shape so it can be shown or
/// forwarded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{error_message} (code {error_code})")]
pub struct ApiError {
    pub error_status: String,
    pub error_message: String,
    pub error_code: u16,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQlError>>,
}

pub type ApiEnvelope<T> = Result<ApiResponse<T>, ApiError>;

impl ApiError {
    pub fn new(message: impl Into<String>, code: u16) -> Self {
        Self {
            error_status: ERROR_STATUS.to_owned(),
            error_message: message.into(),
            error_code: code,
            timestamp: now_rfc3339(),
            errors: None,
        }
    }

    /// No response was received at all.
    pub fn transport() -> Self {
        Self::new(NETWORK_ERROR_MESSAGE, 500)
    }

    /// The session could not be renewed; the caller must sign in again.
    pub fn session_expired() -> Self {
        Self::new(REFRESH_FAILED_MESSAGE, 401)
    }

    pub fn decode(reason: impl std::fmt::Display) -> Self {
        Self::new(format!("Unexpected response shape: {}", reason), 500)
    }

    /// GraphQL answered 200 with body-level errors; the first message is surfaced.
    pub fn graphql(errors: Vec<GraphQlError>) -> Self {
        let message = errors
            .first()
            .map(|e| e.message.to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GRAPHQL_ERROR_MESSAGE.to_owned());
        Self {
            errors: Some(errors),
            ..Self::new(message, 400)
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.error_code == 401
    }
}
