// src/error.rs

use thiserror::Error;

/// Failures of the single GET against the population API.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not a JSON array of objects: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures talking to the host application.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("bridge transport failed for `{action} {resource}`: {source}")]
    Transport {
        action: &'static str,
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("host rejected `{action} {resource}`: {message}")]
    Rejected {
        action: &'static str,
        resource: String,
        message: String,
    },

    #[error("undecodable reply to `{action} {resource}`: {source}")]
    Decode {
        action: &'static str,
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why an activation did not complete.
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("inserting {records} records failed: {source}")]
    Insert {
        records: usize,
        #[source]
        source: BridgeError,
    },
}
