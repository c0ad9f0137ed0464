use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "config.json";

const API_URL_ENV: &str = "CV19_API_URL";
const REGION_ENV: &str = "CV19_REGION";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub initial_region: String,
    pub debug_log: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "https://cv19.report/api/".to_string(),
            initial_region: crate::region::NATIONAL.to_string(),
            debug_log: false,
        }
    }
}

impl Config {
    /// Reads `config.json` from the data directory, then applies environment overrides.
    /// A missing file is not an error.
    pub fn load() -> Result<Self, ConfigError> {
        let path = crate::data_path(Some(CONFIG_FILE));
        let config = Self::read_from(&path)?.unwrap_or_default();
        Ok(config.with_env())
    }

    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// `Ok(None)` when the file does not exist.
    pub fn read_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(Self::from_json(&contents)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        Ok(config.normalized())
    }

    /// Region codes are stored upper case, matching the region list.
    fn normalized(mut self) -> Self {
        let region = self.initial_region.trim();
        self.initial_region = if region.is_empty() {
            crate::region::NATIONAL.to_string()
        } else {
            region.to_uppercase()
        };
        self
    }

    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var(API_URL_ENV).filter(|s| !s.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(region) = var(REGION_ENV).filter(|s| !s.trim().is_empty()) {
            self.initial_region = region;
        }
        self.normalized()
    }
}
