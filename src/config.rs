//! Application configuration.

use std::{env, fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";
pub const API_URL_ENV: &str = "SKIN_JOURNAL_API_URL";
pub const API_KEY_ENV: &str = "SKIN_JOURNAL_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the analysis service, without a trailing path.
    pub api_base_url: String,
    /// Sent as the `X-API-KEY` header.
    pub api_key: String,
    pub ip_lookup_url: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:9000".to_string(),
            api_key: String::new(),
            ip_lookup_url: "https://api.ipify.org?format=json".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the data dir when present, then applies env overrides.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let data = fs::read(&path)
                .with_context(|| format!("failed to read config file {:?}", path))?;
            serde_json::from_slice(&data)
                .with_context(|| format!("failed to parse config file {:?}", path))?
        } else {
            AppConfig::default()
        };
        config.apply_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = key;
        }
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze/skin", self.api_base_url.trim_end_matches('/'))
    }
}
