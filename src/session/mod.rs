//! Session state: the persisted access token, the denormalized session user
//! and the key-value storage both live in.

pub mod storage;
pub mod token;
pub mod token_store;
pub mod user;

use std::sync::Arc;

use anyhow::Result;

use crate::config::settings::{SettingsConfig, StorageType};
use crate::session::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::session::token_store::TokenStore;

/// Builds the token store described by the settings.
pub fn build_token_store(settings: &SettingsConfig) -> Result<TokenStore> {
    let storage: Arc<dyn KeyValueStore> = match (settings.storage.storage_type, &settings.storage.path) {
        (StorageType::File, Some(path)) => Arc::new(FileStore::open(path)?),
        (StorageType::File, None) => anyhow::bail!("settings.storage.path is required when type=file"),
        (StorageType::Memory, _) => Arc::new(MemoryStore::new()),
    };
    Ok(TokenStore::new(storage, settings.expiry_lead_seconds))
}
