pub mod error;
pub mod file;
pub mod memory;
pub mod slot;
pub mod storage;

pub use error::{Result, SessionStoreError};
pub use file::FileSessionStorage;
pub use memory::InMemorySessionStorage;
pub use slot::{DEFAULT_SNAPSHOT_KEY, JsonSlot, SnapshotStore};
pub use storage::SessionStorage;
