use std::sync::Arc;

use crate::Result;

/// A per-session string key-value slot.
///
/// Values live for the duration of one session: they survive a restart of
/// the consumer but are not shared with other sessions. All implementations
/// must be thread-safe (Send + Sync).
pub trait SessionStorage: Send + Sync {
    /// Returns the value stored under `key`, or None if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the value stored under `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every value in this session.
    fn clear(&self) -> Result<()>;
}

impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
