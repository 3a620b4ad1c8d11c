pub mod bridge;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetch;
pub mod schema;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use bridge::{CodapBridge, HostBridge};
pub use config::{Config, InsertFailurePolicy};
pub use controller::{Activation, Control, Controller};
pub use error::{ActivationError, BridgeError, FetchError};
pub use fetch::{PopulationFetcher, RecordSource};
pub use schema::{DatasetDescriptor, IframeDescriptor, Record};
pub use status::{MemorySurface, StatusPresenter, StatusText, Surface, TerminalSurface};
