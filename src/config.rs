// src/config.rs

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};
use tracing::debug;
use url::Url;

use crate::bridge::DEFAULT_BRIDGE_URL;
use crate::fetch::DEFAULT_API_URL;

/// What to do when the host refuses inserted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertFailurePolicy {
    /// Log the failure and still report the fetch count.
    #[default]
    LogAndContinue,
    /// Fail the activation and leave the status alone.
    Abort,
}

impl InsertFailurePolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "log" | "log_and_continue" => Some(Self::LogAndContinue),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: Url,
    pub bridge_url: Url,
    pub insert_failure_policy: InsertFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("default API URL should parse"),
            bridge_url: Url::parse(DEFAULT_BRIDGE_URL).expect("default bridge URL should parse"),
            insert_failure_policy: InsertFailurePolicy::default(),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `DEMOGG_CONFIG`, then `DEMOGG_*` overrides.
    pub fn load() -> Result<Self> {
        let lookup = |k: &str| std::env::var(k).ok();
        let base = match lookup("DEMOGG_CONFIG") {
            Some(path) => Self::from_yaml_file(Path::new(&path))?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg: Config =
            serde_yaml::from_str(&text).with_context(|| format!("parsing config {:?}", path))?;
        debug!(?path, "loaded config file");
        Ok(cfg)
    }

    /// Apply `DEMOGG_API_URL`, `DEMOGG_BRIDGE_URL` and `DEMOGG_INSERT_POLICY`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DEMOGG_API_URL") {
            self.api_url = Url::parse(&v).with_context(|| format!("DEMOGG_API_URL={}", v))?;
        }
        if let Some(v) = lookup("DEMOGG_BRIDGE_URL") {
            self.bridge_url =
                Url::parse(&v).with_context(|| format!("DEMOGG_BRIDGE_URL={}", v))?;
        }
        if let Some(v) = lookup("DEMOGG_INSERT_POLICY") {
            self.insert_failure_policy = InsertFailurePolicy::parse(&v)
                .ok_or_else(|| anyhow!("DEMOGG_INSERT_POLICY={} (expected log|abort)", v))?;
        }
        Ok(self)
    }
}
