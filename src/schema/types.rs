// src/schema/types.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One row of population data as served by population.io.
///
/// Kept as the raw JSON object so a record goes back out exactly as it came
/// in, whatever its values look like.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Attribute names in the order the host table declares them.
    pub const FIELDS: [&'static str; 6] = ["country", "year", "age", "females", "males", "total"];

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}
