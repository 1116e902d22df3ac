use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{Result, storage::SessionStorage};

/// In-memory session storage.
///
/// Clones share the same underlying map, so a clone handed to a consumer
/// observes everything written through the original.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStorage {
    /// Creates a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.items.write().clear();
        Ok(())
    }
}
