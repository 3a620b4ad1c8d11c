// src/bridge/mod.rs

use async_trait::async_trait;

use crate::error::BridgeError;
use crate::schema::{DatasetDescriptor, IframeDescriptor, Record};

pub mod codap;
pub mod message;

pub use codap::{CodapBridge, DEFAULT_BRIDGE_URL};

/// The host application's embedding and data-exchange surface.
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Negotiate how the plugin is framed.
    async fn init(&self, frame: &IframeDescriptor) -> Result<(), BridgeError>;

    /// Make sure a dataset with this shape exists.
    async fn init_data_set(&self, dataset: &DatasetDescriptor) -> Result<(), BridgeError>;

    /// Append `records` to the dataset called `dataset`.
    async fn create_items(&self, records: &[Record], dataset: &str) -> Result<(), BridgeError>;
}
