pub mod descriptor;
pub mod types;

pub use descriptor::{
    Attribute, AttributeType, Collection, DatasetDescriptor, Dimensions, IframeDescriptor,
};
pub use types::Record;
