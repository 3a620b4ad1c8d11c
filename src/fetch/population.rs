// src/fetch/population.rs

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::RecordSource;
use crate::error::FetchError;
use crate::schema::Record;

/// Brazil, 1980, every age bracket.
pub const DEFAULT_API_URL: &str =
    "https://d6wn6bmjj722w.population.io:443/1.0/population/1980/Brazil/";

/// One GET against a fixed population.io endpoint. No retries.
#[derive(Debug, Clone)]
pub struct PopulationFetcher {
    client: Client,
    url: Url,
}

impl PopulationFetcher {
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    /// Status codes are not checked; whatever body came back goes to the decoder.
    async fn get_text(&self) -> Result<String, FetchError> {
        debug!(url = %self.url, "fetching population data");
        let network = |source: reqwest::Error| FetchError::Network {
            url: self.url.to_string(),
            source,
        };
        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(network)?;
        if !resp.status().is_success() {
            warn!(status = %resp.status(), "non-success status; decoding body anyway");
        }
        resp.text().await.map_err(network)
    }
}

#[async_trait]
impl RecordSource for PopulationFetcher {
    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    async fn fetch_records(&self) -> Result<Vec<Record>, FetchError> {
        let body = self.get_text().await?;
        let records: Vec<Record> =
            serde_json::from_str(&body).map_err(|source| FetchError::Parse {
                url: self.url.to_string(),
                source,
            })?;
        info!(records = records.len(), bytes = body.len(), "fetched");
        Ok(records)
    }
}
