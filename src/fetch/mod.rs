// src/fetch/mod.rs

use async_trait::async_trait;

use crate::error::FetchError;
use crate::schema::Record;

pub mod population;

pub use population::{PopulationFetcher, DEFAULT_API_URL};

/// Somewhere records come from.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError>;
}
