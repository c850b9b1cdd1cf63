use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use http::StatusCode;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::broadcast::{Receiver, Sender};
use tracing::{debug, info, warn};

use crate::client::envelope::{ApiEnvelope, ApiError};
use crate::client::normalizer::{self, RawResponse};
use crate::client::request::RequestSpec;
use crate::config::settings::{ApiSettings, ClientConfig};
use crate::helpers::time::get_instant;
use crate::model::auth::AuthResponse;
use crate::observability::metrics::get_metrics;
use crate::refresh::coordinator::{RefreshCoordinator, RefreshError, RefreshOutcome};
use crate::session::build_token_store;
use crate::session::token::AccessToken;
use crate::session::token_store::TokenStore;
use crate::session::user::SessionUser;
use crate::utils::channel::{self, SessionEvent};
use crate::utils::constants::REFRESH_TOKEN_PATH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Rest,
    Graphql,
}

impl Transport {
    fn label(&self) -> &'static str {
        match self {
            Transport::Rest => "rest",
            Transport::Graphql => "graphql",
        }
    }

    fn normalize(&self, raw: RawResponse) -> ApiEnvelope<Value> {
        match self {
            Transport::Rest => normalizer::rest(raw),
            Transport::Graphql => normalizer::graphql(raw),
        }
    }
}

/// Sole entry point for backend calls.
///
/// Attaches the session token, refreshes it through the [`RefreshCoordinator`]
/// when it is expired or rejected, retries a rejected call once and normalizes
/// every outcome into an [`ApiEnvelope`]. Cloning is cheap; clones share the
/// session, the refresh state and the event channel.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: Client,
    settings: ApiSettings,
    tokens: TokenStore,
    coordinator: RefreshCoordinator,
    events: Sender<SessionEvent>,
}

impl ApiClient {
    pub fn new(settings: ApiSettings, tokens: TokenStore) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        info!(base_url = %settings.base_url, "api client ready");
        Ok(Self {
            inner: Arc::new(Inner {
                http,
                settings,
                tokens,
                coordinator: RefreshCoordinator::new(),
                events: channel::run(),
            }),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let tokens = build_token_store(&config.settings)?;
        Self::new(ApiSettings::from(&config.settings), tokens)
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    pub fn settings(&self) -> &ApiSettings {
        &self.inner.settings
    }

    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) async fn publish(&self, event: SessionEvent) {
        let label = event.label();
        get_metrics().await.session_events.with_label_values(&[label]).inc();
        // no subscriber is not an error
        let _ = self.inner.events.send(event);
        debug!(event = label, "session event published");
    }

    pub async fn send<T: DeserializeOwned>(&self, spec: RequestSpec) -> ApiEnvelope<T> {
        self.send_value(spec).await.and_then(normalizer::decode)
    }

    pub async fn send_value(&self, spec: RequestSpec) -> ApiEnvelope<Value> {
        self.execute(spec, Transport::Rest).await
    }

    /// For calls whose payload carries nothing the caller needs.
    pub async fn send_unit(&self, spec: RequestSpec) -> ApiEnvelope<()> {
        self.send_value(spec).await.map(|response| response.map(|_| ()))
    }

    /// GraphQL goes through the same token and retry handling as REST.
    pub async fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> ApiEnvelope<T> {
        let spec = RequestSpec::post(self.inner.settings.graphql_path.as_str())
            .header("Accept", "application/json")
            .json(&json!({ "query": query, "variables": variables }));
        self.execute(spec, Transport::Graphql)
            .await
            .and_then(normalizer::decode)
    }

    /// Forces a coordinated refresh, joining one already in flight.
    pub async fn refresh_session(&self) -> RefreshOutcome {
        self.inner.coordinator.run(|| self.perform_refresh()).await
    }

    async fn execute(&self, spec: RequestSpec, transport: Transport) -> ApiEnvelope<Value> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics
            .requests
            .with_label_values(&[transport.label(), spec.method.as_str()])
            .inc();

        let result = self.execute_with_retry(&spec, transport).await;

        metrics
            .request_duration
            .with_label_values(&[transport.label()])
            .observe(start.elapsed().as_secs_f64());
        if let Err(e) = &result {
            metrics
                .request_failures
                .with_label_values(&[transport.label(), &e.error_code.to_string()])
                .inc();
            debug!(
                method = %spec.method,
                path = %spec.path,
                code = e.error_code,
                "request failed: {}",
                e.error_message
            );
        }
        result
    }

    async fn execute_with_retry(&self, spec: &RequestSpec, transport: Transport) -> ApiEnvelope<Value> {
        let uses_session = spec.bearer.is_none() && !spec.is_auth_endpoint();

        let mut token = match &spec.bearer {
            Some(bearer) => Some(bearer.clone()),
            None if uses_session => match self.current_token().await {
                Ok(token) => token,
                Err(e) => {
                    warn!(path = %spec.path, "session could not be renewed before dispatch: {}", e);
                    return Err(ApiError::session_expired());
                }
            },
            None => None,
        };

        let mut retried = false;
        loop {
            let raw = match self.dispatch(spec, token.as_ref()).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(method = %spec.method, path = %spec.path, "no response from backend: {}", e);
                    return Err(ApiError::transport());
                }
            };

            if raw.status == StatusCode::UNAUTHORIZED && uses_session && !retried {
                retried = true;
                get_metrics().await.unauthorized_retries.inc();
                info!(path = %spec.path, "backend rejected token, refreshing and retrying once");

                match self.refresh_token(token.as_ref()).await {
                    Ok(fresh) => {
                        token = Some(fresh);
                        continue;
                    }
                    Err(e) => {
                        warn!(path = %spec.path, "refresh after 401 failed: {}", e);
                    }
                }
            }

            return transport.normalize(raw);
        }
    }

    /// Stored token, refreshed first when it is already expired.
    async fn current_token(&self) -> Result<Option<AccessToken>, RefreshError> {
        match self.inner.tokens.get_token() {
            Some(token) if self.inner.tokens.is_expired(&token) => {
                debug!("stored token expired, refreshing before dispatch");
                self.refresh_token(Some(&token)).await.map(Some)
            }
            other => Ok(other),
        }
    }

    /// Coordinated refresh replacing `stale`.
    ///
    /// The leader re-reads storage first: a different, still valid token means
    /// another call chain already refreshed and no network call is needed.
    async fn refresh_token(&self, stale: Option<&AccessToken>) -> RefreshOutcome {
        let stale = stale.cloned();
        self.inner
            .coordinator
            .run(|| async move {
                if let Some(current) = self.inner.tokens.get_token() {
                    if Some(&current) != stale.as_ref() && !self.inner.tokens.is_expired(&current) {
                        debug!("adopting token stored by a concurrent refresh");
                        return Ok(current);
                    }
                }
                self.perform_refresh().await
            })
            .await
    }

    async fn perform_refresh(&self) -> RefreshOutcome {
        let metrics = get_metrics().await;
        let outcome = self.request_new_token().await;
        match &outcome {
            Ok(_) => {
                metrics.refreshes.with_label_values(&["success"]).inc();
                info!("token refreshed");
            }
            Err(e) => {
                metrics.refreshes.with_label_values(&["failure"]).inc();
                warn!("token refresh failed, clearing session: {}", e);
                self.inner.tokens.clear();
                self.publish(SessionEvent::Expired).await;
            }
        }
        outcome
    }

    async fn request_new_token(&self) -> RefreshOutcome {
        let spec = RequestSpec::post(REFRESH_TOKEN_PATH).json(&json!({}));
        let raw = self
            .dispatch(&spec, None)
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;
        if !raw.status.is_success() {
            return Err(RefreshError::Rejected {
                status: raw.status.as_u16(),
            });
        }

        let payload: AuthResponse = serde_json::from_value(normalizer::unwrap_rest_body(raw.body).data)
            .map_err(|_| RefreshError::MissingToken)?;
        let token = payload.token().ok_or(RefreshError::MissingToken)?;

        let user_id = match payload.user.as_ref() {
            Some(user) => {
                let user = SessionUser::from_auth_user(user);
                self.inner.tokens.set_session(&token, &user);
                Some(user.id)
            }
            None => {
                self.inner.tokens.set_token(&token);
                self.inner.tokens.user_id()
            }
        };
        self.publish(SessionEvent::Refreshed { user_id }).await;
        Ok(token)
    }

    async fn dispatch(&self, spec: &RequestSpec, token: Option<&AccessToken>) -> reqwest::Result<RawResponse> {
        let url = format!("{}{}", self.inner.settings.base_url, spec.path);
        let mut request = self.inner.http.request(spec.method.clone(), &url);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        for (key, value) in &spec.headers {
            request = request.header(key.as_str(), value.as_str());
        }
        if let Some(token) = token {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(method = %spec.method, path = %spec.path, status = status.as_u16(), "response received");
        Ok(RawResponse::from_text(status, &text))
    }
}
