use std::fmt;

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Opaque bearer credential. The payload segment carries its own `exp`.
///
/// Replaced wholesale on refresh, never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn claims(&self) -> Result<TokenClaims> {
        decode_jwt_from_string(&self.0)
    }

    /// `None` when the token cannot be decoded or carries no `exp` claim.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims()
            .ok()
            .and_then(|claims| claims.exp)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"<redacted>").finish()
    }
}

impl From<String> for AccessToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Claims read from the token payload. Identity claims are only consulted for
/// the OAuth handoff, where the profile endpoint may be unavailable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    pub exp: Option<i64>,
    pub sub: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub id: Option<String>,
    pub username: Option<String>,
    pub preferred_username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub roles: Option<Vec<String>>,
    pub authorities: Option<Vec<String>>,
}

impl TokenClaims {
    pub fn roles(&self) -> Vec<String> {
        self.roles
            .clone()
            .or_else(|| self.authorities.clone())
            .unwrap_or_default()
    }
}

fn decode_jwt_from_string(token_string: &str) -> Result<TokenClaims> {
    let parts: Vec<&str> = token_string.split('.').collect();
    if parts.len() != 3 {
        return Err(anyhow!("invalid JWT format"));
    }

    let payload = parts[1].trim_end_matches('=');
    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|e| anyhow!("base64 decode error: {}", e))?;

    serde_json::from_slice::<TokenClaims>(&decoded)
        .map_err(|e| anyhow!("invalid JWT payload: {}", e))
}
