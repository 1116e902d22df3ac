use serde::{Deserialize, Serialize};

/// Identifier of a camp edition as assigned by the backend.
///
/// Wraps the numeric id so it can't be confused with prices or counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampId(u64);

impl CampId {
    /// Creates a camp ID from its numeric value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for CampId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CampId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<CampId> for u64 {
    fn from(id: CampId) -> Self {
        id.0
    }
}
