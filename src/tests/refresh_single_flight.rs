// Concurrent callers holding an expired token must share one refresh call,
// and every one of them must proceed with the token that call returned.

#[cfg(test)]
mod test {

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde_json::{json, Value};
use tokio::time::sleep;

use crate::client::pipeline::ApiClient;
use crate::config::settings::ApiSettings;
use crate::session::token::AccessToken;
use crate::session::token_store::TokenStore;
use crate::tests::common::{
    auth_body, bearer_of, build_api_client, expired_token, sample_user, spawn_axum, valid_token,
};
use crate::utils::channel::SessionEvent;

/// Backend whose refresh is slow enough for every caller to pile up behind it.
fn backend(refreshes: Arc<AtomicUsize>, fresh: AccessToken, refresh_status: StatusCode) -> Router {
    let accepted = fresh.clone();
    Router::new()
        .route(
            "/api/auth/refresh-token",
            post(move || {
                let refreshes = refreshes.clone();
                let fresh = fresh.clone();
                async move {
                    refreshes.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_millis(150)).await;
                    if refresh_status.is_success() {
                        (StatusCode::OK, Json(auth_body("u-1", &fresh)))
                    } else {
                        (refresh_status, Json(json!({"errorMessage": "Refresh token expired", "errorCode": 401})))
                    }
                }
            }),
        )
        .route(
            "/api/posts/{id}",
            get(move |headers: HeaderMap| {
                let accepted = accepted.clone();
                async move {
                    match bearer_of(&headers) {
                        Some(token) if token == accepted.as_str() => (
                            StatusCode::OK,
                            Json(json!({"status": "success", "message": "ok", "data": {"id": 1, "title": "Hello", "authorName": "alice"}})),
                        ),
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({"errorMessage": "Unauthorized"}))),
                    }
                }
            }),
        )
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_expired_callers_share_one_refresh() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let fresh = valid_token("fresh");
    let (handle, addr) = spawn_axum(backend(refreshes.clone(), fresh.clone(), StatusCode::OK)).await;

    let client = build_api_client(&format!("http://{}", addr));
    client.tokens().set_session(&expired_token(), &sample_user("u-1"));
    let mut events = client.subscribe();

    let mut calls = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        calls.push(tokio::spawn(async move { client.posts().get(1).await }));
    }

    for call in calls {
        let response = call.await.unwrap().expect("call succeeds with refreshed token");
        assert_eq!(response.data.title, "Hello");
    }
    assert_eq!(refreshes.load(Ordering::SeqCst), 1, "exactly one refresh call expected");
    assert_eq!(client.tokens().get_token(), Some(fresh));
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Refreshed { user_id: Some("u-1".into()) }
    );
    assert!(events.try_recv().is_err(), "one refresh, one event");

    handle.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failed_refresh_expires_session_for_every_waiter() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let (handle, addr) = spawn_axum(backend(refreshes.clone(), valid_token("unused"), StatusCode::UNAUTHORIZED)).await;

    let client = build_api_client(&format!("http://{}", addr));
    client.tokens().set_session(&expired_token(), &sample_user("u-1"));
    let mut events = client.subscribe();

    let (posts, comments) = (client.posts(), client.comments());
    let (first, second, third) = tokio::join!(posts.get(1), posts.get(2), comments.for_post(1));

    for error in [first.unwrap_err(), second.unwrap_err(), third.unwrap_err()] {
        assert_eq!(error.error_code, 401);
        assert_eq!(error.error_message, "Token refresh failed");
    }
    assert_eq!(refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(client.tokens().get_token(), None);
    assert_eq!(client.tokens().session_user(), None);
    assert_eq!(events.try_recv().unwrap(), SessionEvent::Expired);

    handle.abort();
}

#[tokio::test]
async fn token_stored_by_another_chain_is_adopted_without_refresh() {
    let refreshes = Arc::new(AtomicUsize::new(0));
    let revoked = valid_token("revoked");
    let replacement = valid_token("replacement");

    let tokens = TokenStore::default();

    // the first request swaps the stored token before answering 401, the way a
    // concurrent sign-in would
    let router = Router::new()
        .route(
            "/api/auth/refresh-token",
            post({
                let refreshes = refreshes.clone();
                move || {
                    let refreshes = refreshes.clone();
                    async move {
                        refreshes.fetch_add(1, Ordering::SeqCst);
                        (StatusCode::UNAUTHORIZED, Json(Value::Null))
                    }
                }
            }),
        )
        .route(
            "/api/tags/popular",
            get({
                let revoked = revoked.clone();
                let replacement = replacement.clone();
                let tokens = tokens.clone();
                move |headers: HeaderMap| {
                    let tokens = tokens.clone();
                    let revoked = revoked.clone();
                    let replacement = replacement.clone();
                    async move {
                        let bearer = bearer_of(&headers);
                        if bearer.as_deref() == Some(revoked.as_str()) {
                            tokens.set_token(&replacement);
                            (StatusCode::UNAUTHORIZED, Json(Value::Null))
                        } else if bearer.as_deref() == Some(replacement.as_str()) {
                            (StatusCode::OK, Json(json!([{"name": "rust"}])))
                        } else {
                            (StatusCode::UNAUTHORIZED, Json(Value::Null))
                        }
                    }
                }
            }),
        );
    let (handle, addr) = spawn_axum(router).await;

    let client = ApiClient::new(ApiSettings::new(&format!("http://{}", addr)), tokens.clone()).unwrap();
    tokens.set_token(&revoked);

    let response = client.tags().popular().await.expect("retried with adopted token");
    assert_eq!(response.data[0].name, "rust");
    assert_eq!(refreshes.load(Ordering::SeqCst), 0);

    handle.abort();
}

}
