// src/bridge/message.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Get,
    Create,
    Update,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Create => "create",
            Action::Update => "update",
        }
    }
}

/// A single plugin-protocol request.
#[derive(Debug, Serialize)]
pub struct Command<V> {
    pub action: Action,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<V>,
}

/// The host's answer to a [`Command`].
#[derive(Debug, Deserialize, Default)]
pub struct Reply {
    pub success: bool,
    #[serde(default)]
    pub values: Option<Value>,
}

impl Reply {
    /// Best-effort reason for a failed reply.
    pub fn error_message(&self) -> String {
        self.values
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("host reported success: false")
            .to_string()
    }
}

pub fn data_context(name: &str) -> String {
    format!("dataContext[{}]", name)
}

pub fn items_of(name: &str) -> String {
    format!("dataContext[{}].item", name)
}
