//! Turns raw REST and GraphQL responses into one envelope shape.

use http::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::client::envelope::{ApiEnvelope, ApiError, ApiResponse, GraphQlError};
use crate::helpers::time::now_rfc3339;
use crate::utils::constants::{ERROR_STATUS, GRAPHQL_FAILED_MESSAGE, SUCCESS_MESSAGE, SUCCESS_STATUS};

/// Response as received, before any interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// Empty body reads as `null`, a non-JSON body as a JSON string.
    pub fn from_text(status: StatusCode, text: &str) -> Self {
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_owned()))
        };
        Self { status, body }
    }
}

pub fn rest(raw: RawResponse) -> ApiEnvelope<Value> {
    if !raw.status.is_success() {
        return Err(rest_failure(raw.status, &raw.body));
    }
    Ok(unwrap_rest_body(raw.body))
}

/// A body that already looks like `{status, data, ...}` is unwrapped once;
/// anything else is wrapped once.
pub fn unwrap_rest_body(body: Value) -> ApiResponse<Value> {
    match body {
        Value::Object(mut map) if map.contains_key("status") && map.contains_key("data") => {
            let status = take_string(&mut map, "status").unwrap_or_else(|| SUCCESS_STATUS.to_owned());
            let message = take_string(&mut map, "message").unwrap_or_else(|| SUCCESS_MESSAGE.to_owned());
            let data = map.remove("data").unwrap_or(Value::Null);
            ApiResponse { status, message, data }
        }
        other => ApiResponse::success(other),
    }
}

fn rest_failure(status: StatusCode, body: &Value) -> ApiError {
    let field = |name: &str| body.get(name).and_then(Value::as_str).filter(|s| !s.is_empty());

    let error_message = field("errorMessage")
        .or_else(|| field("message"))
        .map(str::to_owned)
        .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
    let error_code = body
        .get("errorCode")
        .and_then(Value::as_u64)
        .and_then(|code| u16::try_from(code).ok())
        .unwrap_or_else(|| status.as_u16());

    ApiError {
        error_status: field("errorStatus").unwrap_or(ERROR_STATUS).to_owned(),
        error_message,
        error_code,
        timestamp: field("timestamp")
            .map(str::to_owned)
            .unwrap_or_else(now_rfc3339),
        errors: None,
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

pub fn graphql(raw: RawResponse) -> ApiEnvelope<Value> {
    let body: GraphQlBody = serde_json::from_value(raw.body).unwrap_or(GraphQlBody {
        data: None,
        errors: None,
    });

    if !raw.status.is_success() {
        let message = body
            .errors
            .as_ref()
            .and_then(|errors| errors.first())
            .map(|e| e.message.to_owned())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GRAPHQL_FAILED_MESSAGE.to_owned());
        return Err(ApiError::new(message, raw.status.as_u16()));
    }

    match body.errors {
        Some(errors) if !errors.is_empty() => {
            error!(
                errors = %serde_json::to_string(&errors).unwrap_or_default(),
                "graphql response carried errors"
            );
            Err(ApiError::graphql(errors))
        }
        _ => Ok(ApiResponse::success(body.data.unwrap_or(Value::Null))),
    }
}

/// Converts the untyped payload into the caller's type.
pub fn decode<T: DeserializeOwned>(response: ApiResponse<Value>) -> ApiEnvelope<T> {
    let ApiResponse { status, message, data } = response;
    serde_json::from_value(data)
        .map(|data| ApiResponse { status, message, data })
        .map_err(ApiError::decode)
}

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_body_is_unwrapped_once() {
        let raw = RawResponse::new(
            StatusCode::OK,
            json!({"status": "success", "message": "Post loaded", "data": {"id": 7, "title": "Hello"}}),
        );

        let response = rest(raw).unwrap();
        assert_eq!(response.message, "Post loaded");
        assert_eq!(response.data, json!({"id": 7, "title": "Hello"}));
    }

    #[test]
    fn bare_body_is_wrapped_once() {
        let raw = RawResponse::new(StatusCode::OK, json!([{"name": "rust"}]));

        let response = rest(raw).unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.message, "Request successful");
        assert_eq!(response.data, json!([{"name": "rust"}]));
    }

    #[test]
    fn body_with_only_status_is_not_treated_as_wrapped() {
        let raw = RawResponse::new(StatusCode::OK, json!({"status": "UP"}));
        assert_eq!(rest(raw).unwrap().data, json!({"status": "UP"}));
    }

    #[test]
    fn rest_failure_passes_backend_error_through() {
        let raw = RawResponse::new(
            StatusCode::CONFLICT,
            json!({
                "errorStatus": "CONFLICT",
                "errorMessage": "Email already registered",
                "errorCode": 409,
                "timestamp": "2025-01-01T00:00:00Z"
            }),
        );

        let error = rest(raw).unwrap_err();
        assert_eq!(error.error_status, "CONFLICT");
        assert_eq!(error.error_message, "Email already registered");
        assert_eq!(error.error_code, 409);
        assert_eq!(error.timestamp, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn rest_failure_without_body_falls_back_to_status() {
        let error = rest(RawResponse::from_text(StatusCode::INTERNAL_SERVER_ERROR, "")).unwrap_err();

        assert_eq!(error.error_status, "error");
        assert_eq!(error.error_message, "Request failed with status code 500");
        assert_eq!(error.error_code, 500);
        assert!(!error.timestamp.is_empty());
    }

    #[test]
    fn graphql_errors_become_failure_envelope() {
        let raw = RawResponse::new(
            StatusCode::OK,
            json!({"data": null, "errors": [{"message": "Invalid sort field"}, {"message": "other"}]}),
        );

        let error = graphql(raw).unwrap_err();
        assert_eq!(error.error_message, "Invalid sort field");
        assert_eq!(error.error_code, 400);
        assert_eq!(error.errors.map(|e| e.len()), Some(2));
    }

    #[test]
    fn graphql_empty_error_list_is_success() {
        let raw = RawResponse::new(StatusCode::OK, json!({"data": {"getAllPosts": {}}, "errors": []}));
        assert_eq!(graphql(raw).unwrap().data, json!({"getAllPosts": {}}));
    }

    #[test]
    fn graphql_http_failure_uses_status_code() {
        let raw = RawResponse::new(StatusCode::BAD_GATEWAY, Value::String("upstream down".into()));

        let error = graphql(raw).unwrap_err();
        assert_eq!(error.error_message, "GraphQL request failed");
        assert_eq!(error.error_code, 502);
    }

    #[test]
    fn decode_reports_shape_mismatch() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Post {
            id: u64,
        }

        let error = decode::<Post>(ApiResponse::success(json!({"id": "x"}))).unwrap_err();
        assert_eq!(error.error_code, 500);
        assert!(error.error_message.starts_with("Unexpected response shape"));

        let unit = decode::<()>(ApiResponse::success(Value::Null)).unwrap();
        assert_eq!(unit.data, ());
    }
}
