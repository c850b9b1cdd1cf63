use serde::{Deserialize, Serialize};

use crate::helpers::time::now_rfc3339;
use crate::model::auth::AuthUser;
use crate::model::user::UserProfile;
use crate::session::token::TokenClaims;

/// Denormalized view of the signed-in principal, persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl SessionUser {
    pub fn from_auth_user(user: &AuthUser) -> Self {
        let now = now_rfc3339();
        Self {
            id: user.id.to_owned(),
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            name: user.username.to_owned(),
            roles: user.roles.clone().unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Profile endpoint carries no roles; they come from the token.
    pub fn from_profile(profile: &UserProfile, claims: Option<&TokenClaims>) -> Self {
        let now = now_rfc3339();
        Self {
            id: profile.user_id.to_owned(),
            username: profile.username.to_owned(),
            email: profile.email.to_owned(),
            name: profile.username.to_owned(),
            roles: claims.map(TokenClaims::roles).unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Best-effort user built from token claims alone. `None` without an identity claim.
    pub fn from_claims(claims: &TokenClaims) -> Option<Self> {
        let id = claims
            .sub
            .clone()
            .or_else(|| claims.user_id.clone())
            .or_else(|| claims.id.clone())?;
        let now = now_rfc3339();
        Some(Self {
            id,
            name: claims
                .name
                .clone()
                .or_else(|| claims.given_name.clone())
                .unwrap_or_else(|| "User".to_owned()),
            email: claims.email.clone().unwrap_or_default(),
            username: claims
                .username
                .clone()
                .or_else(|| claims.preferred_username.clone())
                .or_else(|| claims.email.clone())
                .unwrap_or_default(),
            roles: claims.roles(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.roles
            .iter()
            .any(|role| role == "ADMIN" || role == "ROLE_ADMIN")
    }
}
