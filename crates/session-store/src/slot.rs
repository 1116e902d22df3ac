//! Typed snapshot persistence on top of a [`SessionStorage`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Result, storage::SessionStorage};

/// Key under which the reservation draft is kept.
pub const DEFAULT_SNAPSHOT_KEY: &str = "reservation";

/// A durable slot holding at most one snapshot of `T`.
pub trait SnapshotStore<T>: Send + Sync {
    /// Returns the stored snapshot.
    ///
    /// Returns None if nothing has been saved yet.
    fn load(&self) -> Result<Option<T>>;

    /// Saves a snapshot, replacing the previous one.
    fn save(&self, snapshot: &T) -> Result<()>;

    /// Drops the stored snapshot.
    fn discard(&self) -> Result<()>;
}

/// Stores snapshots as JSON under a single key of a [`SessionStorage`].
#[derive(Debug, Clone)]
pub struct JsonSlot<S> {
    storage: S,
    key: String,
}

impl<S: SessionStorage> JsonSlot<S> {
    /// Creates a slot bound to [`DEFAULT_SNAPSHOT_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_SNAPSHOT_KEY)
    }

    /// Creates a slot bound to `key`.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Returns the key this slot writes to.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<S, T> SnapshotStore<T> for JsonSlot<S>
where
    S: SessionStorage,
    T: Serialize + DeserializeOwned,
{
    fn load(&self) -> Result<Option<T>> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &T) -> Result<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.storage.set_item(&self.key, &raw)
    }

    fn discard(&self) -> Result<()> {
        self.storage.remove_item(&self.key)
    }
}
