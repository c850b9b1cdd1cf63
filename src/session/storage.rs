use std::collections::HashMap;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{anyhow, Result};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, info};

/// One write to the store: `Some` sets the key, `None` removes it.
pub type StoreEntry = (String, Option<String>);

/// Client-side persistent key-value storage.
///
/// `apply` is all-or-nothing: concurrent readers never observe half of a batch.
/// Implementations are synchronous and may block on disk; the session is small
/// and written only on sign-in, refresh and sign-out.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;

    fn apply(&self, batch: Vec<StoreEntry>) -> Result<()>;

    fn set(&self, key: &str, value: String) -> Result<()> {
        self.apply(vec![(key.to_owned(), Some(value))])
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.apply(vec![(key.to_owned(), None)])
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn apply_batch(map: &mut HashMap<String, String>, batch: Vec<StoreEntry>) {
    for (key, value) in batch {
        match value {
            Some(value) => {
                map.insert(key, value);
            }
            None => {
                map.remove(&key);
            }
        }
    }
}

/// Process-local storage, lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.inner).get(key).cloned()
    }

    fn apply(&self, batch: Vec<StoreEntry>) -> Result<()> {
        apply_batch(&mut lock(&self.inner), batch);
        Ok(())
    }
}

/// JSON document on disk, rewritten atomically (tmp + rename, 0600) on every batch.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    inner: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let map = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    anyhow!("session file '{}' is not valid: {}", path.display(), e)
                })?
            }
        } else {
            HashMap::new()
        };
        info!("session storage at '{}', keys loaded: {}", path.display(), map.len());
        Ok(Self {
            path,
            inner: Mutex::new(map),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(map)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }
        fs::rename(&tmp, &self.path)?;
        debug!("session file '{}' written", self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.inner).get(key).cloned()
    }

    fn apply(&self, batch: Vec<StoreEntry>) -> Result<()> {
        blocking(|| {
            let mut guard = lock(&self.inner);
            apply_batch(&mut guard, batch);
            self.persist(&guard)
        })
    }
}

/// Disk writes on a multi-threaded runtime hand the worker's other tasks off first.
fn blocking<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}
