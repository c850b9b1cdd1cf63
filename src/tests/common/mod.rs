// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

use crate::client::pipeline::ApiClient;
use crate::config::settings::ApiSettings;
use crate::helpers::time::now_i64;
use crate::session::storage::MemoryStore;
use crate::session::token::AccessToken;
use crate::session::token_store::TokenStore;
use crate::session::user::SessionUser;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Unsigned JWT-shaped token; only the payload segment is ever read.
pub fn jwt_with_payload(payload: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{}.{}.signature", header, body)
}

pub fn jwt_expiring_at(exp: i64) -> String {
    jwt_with_payload(&json!({"sub": "u-1", "exp": exp}))
}

pub fn valid_token(tag: &str) -> AccessToken {
    AccessToken::new(jwt_with_payload(&json!({"sub": "u-1", "jti": tag, "exp": now_i64() + 3600})))
}

pub fn expired_token() -> AccessToken {
    AccessToken::new(jwt_expiring_at(now_i64() - 60))
}

pub fn sample_user(id: &str) -> SessionUser {
    SessionUser {
        id: id.to_owned(),
        username: "alice".to_owned(),
        email: "alice@example.com".to_owned(),
        name: "alice".to_owned(),
        roles: vec!["USER".to_owned()],
        created_at: "2025-01-01T00:00:00.000Z".to_owned(),
        updated_at: "2025-01-01T00:00:00.000Z".to_owned(),
    }
}

/// Client with in-memory session storage pointed at `base_url`.
pub fn build_api_client(base_url: &str) -> ApiClient {
    let tokens = TokenStore::new(Arc::new(MemoryStore::new()), 30);
    ApiClient::new(ApiSettings::new(base_url), tokens).expect("api client")
}

pub fn bearer_of(headers: &http::HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}

/// `{status, message, data: {user, accessToken}}` as the auth endpoints answer.
pub fn auth_body(user_id: &str, token: &AccessToken) -> Value {
    json!({
        "status": "success",
        "message": "Authenticated",
        "data": {
            "user": {"id": user_id, "username": "alice", "email": "alice@example.com", "roles": ["USER"]},
            "accessToken": token.as_str()
        }
    })
}
