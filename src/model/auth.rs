use serde::{Deserialize, Serialize};

use crate::helpers::serde::id_string;
use crate::session::token::AccessToken;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// User as returned by sign-in, register and refresh.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl AuthResponse {
    pub fn token(&self) -> Option<AccessToken> {
        self.access_token
            .as_deref()
            .filter(|token| !token.is_empty())
            .map(AccessToken::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_response_accepts_numeric_id_and_missing_roles() {
        let response: AuthResponse = serde_json::from_value(json!({
            "user": {"id": 42, "username": "alice", "email": "a@example.com"},
            "accessToken": "abc"
        }))
        .unwrap();

        let user = response.user.as_ref().unwrap();
        assert_eq!(user.id, "42");
        assert_eq!(user.roles, None);
        assert_eq!(response.token(), Some(AccessToken::new("abc")));
    }

    #[test]
    fn empty_access_token_is_no_token() {
        let response: AuthResponse = serde_json::from_value(json!({"accessToken": ""})).unwrap();
        assert_eq!(response.token(), None);
    }
}
