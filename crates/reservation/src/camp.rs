//! Selected camp snapshot.

use chrono::NaiveDate;
use common::CampId;
use serde::{Deserialize, Serialize};

/// Denormalized copy of the camp edition the user is booking.
///
/// Attached once a camp is chosen; it never takes part in pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub id: CampId,
    pub name: String,
    pub properties: CampProperties,
}

/// Period, place and dates of a camp edition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampProperties {
    /// Season label, e.g. `"lato"` or `"zima"`.
    pub period: String,
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl Camp {
    pub fn new(id: impl Into<CampId>, name: impl Into<String>, properties: CampProperties) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            properties,
        }
    }
}
