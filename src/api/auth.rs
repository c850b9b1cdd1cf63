use tracing::{info, warn};

use crate::client::envelope::{ApiEnvelope, ApiError, ApiResponse};
use crate::client::pipeline::ApiClient;
use crate::client::request::RequestSpec;
use crate::model::auth::{AuthResponse, LoginRequest, RegisterRequest};
use crate::model::user::UserProfile;
use crate::refresh::coordinator::RefreshOutcome;
use crate::session::token::AccessToken;
use crate::session::user::SessionUser;
use crate::utils::channel::SessionEvent;

const PROFILE_PATH: &str = "/api/users/profile";

/// Sign-in, registration, sign-out and the OAuth handoff. These are the only
/// writers of the session besides the refresh path.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiEnvelope<SessionUser> {
        let response = self
            .client
            .send::<AuthResponse>(RequestSpec::post("/api/auth/sign-in").json(request))
            .await?;
        self.start_session(response).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiEnvelope<SessionUser> {
        let response = self
            .client
            .send::<AuthResponse>(RequestSpec::post("/api/auth/register").json(request))
            .await?;
        self.start_session(response).await
    }

    /// Best effort on the backend side; local state is always cleared.
    pub async fn logout(&self) {
        let tokens = self.client.tokens();
        if let Some(token) = tokens.get_token() {
            let spec = RequestSpec::post("/api/auth/sign-out").bearer(token);
            if let Err(e) = self.client.send_unit(spec).await {
                warn!("sign out request failed: {}", e);
            }
        }
        tokens.clear();
        self.client.publish(SessionEvent::SignedOut).await;
        info!("signed out");
    }

    /// Coordinated with any refresh already triggered by the pipeline.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.client.refresh_session().await
    }

    /// OAuth handoff: the provider redirect delivered a token and nothing else.
    ///
    /// The profile is fetched with the token as an explicit credential; if that
    /// fails the user is built from the token claims, and if the claims carry
    /// no identity either the token is dropped and the profile error returned.
    pub async fn login_with_token(&self, token: AccessToken) -> ApiEnvelope<SessionUser> {
        let tokens = self.client.tokens();
        tokens.set_token(&token);
        let claims = token.claims().ok();

        let spec = RequestSpec::get(PROFILE_PATH).bearer(token.clone());
        let (user, response) = match self.client.send::<UserProfile>(spec).await {
            Ok(response) => {
                let user = SessionUser::from_profile(&response.data, claims.as_ref());
                let response = response.map(|_| ());
                (user, response)
            }
            Err(error) => {
                warn!("profile fetch failed, falling back to token claims: {}", error);
                match claims.as_ref().and_then(SessionUser::from_claims) {
                    Some(user) => (user, ApiResponse::with_message("Logged in successfully", ())),
                    None => {
                        tokens.remove_token();
                        return Err(error);
                    }
                }
            }
        };

        tokens.set_session(&token, &user);
        self.client
            .publish(SessionEvent::SignedIn {
                user_id: user.id.to_owned(),
            })
            .await;
        Ok(response.map(|_| user))
    }

    pub fn stored_user(&self) -> Option<SessionUser> {
        self.client.tokens().session_user()
    }

    pub async fn profile(&self) -> ApiEnvelope<UserProfile> {
        self.client.send(RequestSpec::get(PROFILE_PATH)).await
    }

    async fn start_session(&self, response: ApiResponse<AuthResponse>) -> ApiEnvelope<SessionUser> {
        let token = response.data.token();
        let (token, auth_user) = match (token, response.data.user.as_ref()) {
            (Some(token), Some(user)) => (token, user),
            _ => return Err(ApiError::decode("sign-in response carried no user or access token")),
        };

        let user = SessionUser::from_auth_user(auth_user);
        self.client.tokens().set_session(&token, &user);
        self.client
            .publish(SessionEvent::SignedIn {
                user_id: user.id.to_owned(),
            })
            .await;
        info!(user_id = %user.id, "signed in");
        Ok(response.map(|_| user))
    }
}
