use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

use crate::helpers::time::now;
use crate::session::storage::{KeyValueStore, MemoryStore, StoreEntry};
use crate::session::token::AccessToken;
use crate::session::user::SessionUser;
use crate::utils::constants::{DEFAULT_EXPIRY_LEAD_SECS, TOKEN_KEY, USER_ID_KEY, USER_KEY};

/// Persisted access token and the session user derived from it.
///
/// The token and the user are always written and cleared in one storage batch
/// so they never disagree about identity. Nothing here returns an error:
/// storage failures are logged and malformed tokens read as expired.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
    lead_time: Duration,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(Arc::new(MemoryStore::new()), DEFAULT_EXPIRY_LEAD_SECS)
    }
}

impl TokenStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, lead_time_seconds: u64) -> Self {
        let lead_time = i64::try_from(lead_time_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or_else(|| Duration::seconds(DEFAULT_EXPIRY_LEAD_SECS as i64));
        Self { storage, lead_time }
    }

    pub fn get_token(&self) -> Option<AccessToken> {
        self.storage
            .get(TOKEN_KEY)
            .filter(|value| !value.is_empty())
            .map(AccessToken::new)
    }

    pub fn set_token(&self, token: &AccessToken) {
        self.write(vec![(TOKEN_KEY.to_owned(), Some(token.as_str().to_owned()))]);
    }

    pub fn remove_token(&self) {
        self.write(vec![(TOKEN_KEY.to_owned(), None)]);
    }

    pub fn is_expired(&self, token: &AccessToken) -> bool {
        self.is_expired_at(token, now())
    }

    /// Expired once `at` reaches `exp - lead_time`; undecodable means expired.
    pub fn is_expired_at(&self, token: &AccessToken, at: DateTime<Utc>) -> bool {
        match token.expires_at() {
            Some(expires_at) => expires_at
                .checked_sub_signed(self.lead_time)
                .map_or(true, |deadline| at >= deadline),
            None => {
                debug!("token has no decodable expiry, treating as expired");
                true
            }
        }
    }

    pub fn session_user(&self) -> Option<SessionUser> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw)
            .inspect_err(|e| warn!("stored session user is not valid: {}", e))
            .ok()
    }

    pub fn user_id(&self) -> Option<String> {
        self.storage.get(USER_ID_KEY)
    }

    /// Token, user id and user in one batch.
    pub fn set_session(&self, token: &AccessToken, user: &SessionUser) {
        let mut batch = vec![(TOKEN_KEY.to_owned(), Some(token.as_str().to_owned()))];
        batch.extend(user_entries(user));
        self.write(batch);
    }

    pub fn set_user(&self, user: &SessionUser) {
        self.write(user_entries(user));
    }

    pub fn clear(&self) {
        self.write(vec![
            (USER_ID_KEY.to_owned(), None),
            (USER_KEY.to_owned(), None),
            (TOKEN_KEY.to_owned(), None),
        ]);
    }

    fn write(&self, batch: Vec<StoreEntry>) {
        if let Err(e) = self.storage.apply(batch) {
            error!("session storage write failed: {}", e);
        }
    }
}

fn user_entries(user: &SessionUser) -> Vec<StoreEntry> {
    match serde_json::to_string(user) {
        Ok(json) => vec![
            (USER_ID_KEY.to_owned(), Some(user.id.to_owned())),
            (USER_KEY.to_owned(), Some(json)),
        ],
        Err(e) => {
            error!("session user cannot be serialized: {}", e);
            vec![(USER_ID_KEY.to_owned(), None), (USER_KEY.to_owned(), None)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::FileStore;
    use crate::tests::common::{jwt_expiring_at, sample_user};

    #[test]
    fn expiry_honours_lead_time_boundary() {
        let store = TokenStore::default();
        let exp = 1_900_000_000;
        let token = AccessToken::new(jwt_expiring_at(exp));
        let nominal = DateTime::from_timestamp(exp, 0).unwrap();

        let boundary = nominal - Duration::seconds(30);
        assert!(store.is_expired_at(&token, boundary));
        assert!(store.is_expired_at(&token, boundary + Duration::milliseconds(1)));
        assert!(store.is_expired_at(&token, nominal));
        assert!(!store.is_expired_at(&token, boundary - Duration::milliseconds(1)));
        assert!(!store.is_expired_at(&token, nominal - Duration::minutes(10)));
    }

    #[test]
    fn custom_lead_time_is_applied() {
        let store = TokenStore::new(Arc::new(MemoryStore::new()), 120);
        let exp = 1_900_000_000;
        let token = AccessToken::new(jwt_expiring_at(exp));
        let nominal = DateTime::from_timestamp(exp, 0).unwrap();

        assert!(store.is_expired_at(&token, nominal - Duration::seconds(120)));
        assert!(!store.is_expired_at(&token, nominal - Duration::seconds(121)));
    }

    #[test]
    fn malformed_token_fails_closed() {
        let store = TokenStore::default();
        assert!(store.is_expired(&AccessToken::new("garbage")));
        assert!(store.is_expired(&AccessToken::new("a.e30.c")));
    }

    #[test]
    fn expiry_at_the_edge_of_time_reads_expired() {
        let store = TokenStore::default();
        let token = AccessToken::new(jwt_expiring_at(DateTime::<Utc>::MIN_UTC.timestamp()));

        assert!(token.expires_at().is_some());
        assert!(store.is_expired(&token));
    }

    #[test]
    fn user_update_keeps_the_token() {
        let store = TokenStore::default();
        let token = AccessToken::new(jwt_expiring_at(now().timestamp() + 600));
        store.set_session(&token, &sample_user("u-1"));

        let mut renamed = sample_user("u-1");
        renamed.username = "renamed".into();
        store.set_user(&renamed);

        assert_eq!(store.get_token(), Some(token));
        assert_eq!(store.session_user().map(|u| u.username).as_deref(), Some("renamed"));
    }

    #[test]
    fn session_is_written_and_cleared_together() {
        let store = TokenStore::default();
        let token = AccessToken::new(jwt_expiring_at(now().timestamp() + 600));
        let user = sample_user("u-1");

        store.set_session(&token, &user);
        assert_eq!(store.get_token(), Some(token));
        assert_eq!(store.user_id().as_deref(), Some("u-1"));
        assert_eq!(store.session_user(), Some(user));

        store.clear();
        assert_eq!(store.get_token(), None);
        assert_eq!(store.user_id(), None);
        assert_eq!(store.session_user(), None);
    }

    #[test]
    fn file_backed_session_is_restored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let token = AccessToken::new(jwt_expiring_at(now().timestamp() + 600));

        {
            let store = TokenStore::new(Arc::new(FileStore::open(&path).unwrap()), 30);
            store.set_session(&token, &sample_user("u-9"));
        }

        let store = TokenStore::new(Arc::new(FileStore::open(&path).unwrap()), 30);
        assert_eq!(store.get_token(), Some(token));
        assert_eq!(store.session_user().map(|u| u.id).as_deref(), Some("u-9"));
    }
}
