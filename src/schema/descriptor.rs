// src/schema/descriptor.rs

use once_cell::sync::Lazy;
use serde::Serialize;

use super::types::Record;

/// How the host table treats an attribute's values.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Categorical,
    Numeric,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: AttributeType,
}

/// One hierarchical level of a host dataset.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct Collection {
    pub name: String,
    pub attrs: Vec<Attribute>,
}

/// Shape of the table the host creates to receive records.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub name: String,
    pub title: String,
    pub collections: Vec<Collection>,
}

static DEMOGRAPHICS: Lazy<DatasetDescriptor> = Lazy::new(|| DatasetDescriptor {
    name: "demogg".to_string(),
    title: "demographic data".to_string(),
    collections: vec![Collection {
        name: "years".to_string(),
        attrs: Record::FIELDS
            .iter()
            .map(|&name| Attribute {
                name: name.to_string(),
                ty: if name == "country" {
                    AttributeType::Categorical
                } else {
                    AttributeType::Numeric
                },
            })
            .collect(),
    }],
});

impl DatasetDescriptor {
    /// The one dataset this plugin declares.
    pub fn demographics() -> &'static DatasetDescriptor {
        &DEMOGRAPHICS
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// What the host needs to frame the plugin.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct IframeDescriptor {
    pub name: String,
    pub title: String,
    pub version: String,
    pub dimensions: Dimensions,
}

static FRAME: Lazy<IframeDescriptor> = Lazy::new(|| IframeDescriptor {
    name: "demogg".to_string(),
    title: "demographics plugin".to_string(),
    version: "0.001".to_string(),
    dimensions: Dimensions {
        width: 256,
        height: 192,
    },
});

impl IframeDescriptor {
    pub fn demographics() -> &'static IframeDescriptor {
        &FRAME
    }
}
