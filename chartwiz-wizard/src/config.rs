//! Settings: defaults, then an optional TOML file, then environment.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:3000/api"
//! timeout_secs = 30
//! max_retries = 2
//! report_type_id = 4
//! # fixture = "indicators.json"   # serve indicators from a local file
//!
//! [catalog]
//! page_size = 10
//! combined_sources = ["macro"]
//! combined_max_pages = 50
//!
//! [search]
//! debounce_ms = 300
//!
//! [output]
//! chart_log = "charts.jsonl"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use chartwiz_core::catalog::CatalogOptions;
use chartwiz_core::data::HttpConfig;
use chartwiz_core::domain::Category;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const ENV_API_URL: &str = "CHARTWIZ_API_URL";
pub const ENV_API_TIMEOUT: &str = "CHARTWIZ_API_TIMEOUT_SECS";
pub const ENV_REPORT_TYPE: &str = "CHARTWIZ_REPORT_TYPE_ID";
pub const ENV_FIXTURE: &str = "CHARTWIZ_FIXTURE";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_type_id: Option<i64>,
    /// Offline mode: read indicators from this JSON file instead of `base_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".into(),
            timeout_secs: 30,
            max_retries: 2,
            report_type_id: None,
            fixture: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub page_size: u32,
    pub combined_sources: Vec<Category>,
    pub combined_max_pages: u32,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        let defaults = CatalogOptions::default();
        Self {
            page_size: defaults.page_size,
            combined_sources: defaults.combined_sources,
            combined_max_pages: defaults.combined_max_pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub debounce_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_log: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api: ApiSettings,
    pub catalog: CatalogSettings,
    pub search: SearchSettings,
    pub output: OutputSettings,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Defaults, overlaid by `path` if given, then by the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                debug!(path = %path.display(), "settings file loaded");
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        settings.apply_env(|var| std::env::var(var).ok())?;
        Ok(settings)
    }

    /// Apply overrides from `lookup` (the environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup(ENV_API_TIMEOUT) {
            self.api.timeout_secs = raw.trim().parse().map_err(|_| SettingsError::Env {
                var: ENV_API_TIMEOUT,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(ENV_REPORT_TYPE) {
            let id = raw.trim().parse().map_err(|_| SettingsError::Env {
                var: ENV_REPORT_TYPE,
                value: raw.clone(),
            })?;
            self.api.report_type_id = Some(id);
        }
        if let Some(path) = lookup(ENV_FIXTURE) {
            self.api.fixture = Some(PathBuf::from(path));
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.api.base_url.trim().is_empty() {
            return Err(SettingsError::Invalid("api.base_url is empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(SettingsError::Invalid("api.timeout_secs must be positive".into()));
        }
        if self.catalog.page_size == 0 {
            return Err(SettingsError::Invalid("catalog.page_size must be positive".into()));
        }
        if self.catalog.combined_max_pages == 0 {
            return Err(SettingsError::Invalid(
                "catalog.combined_max_pages must be positive".into(),
            ));
        }
        if let Some(c) = self.catalog.combined_sources.iter().find(|c| c.is_combination()) {
            return Err(SettingsError::Invalid(format!(
                "catalog.combined_sources cannot include '{c}'"
            )));
        }
        Ok(())
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
            max_retries: self.api.max_retries,
            ..HttpConfig::default()
        }
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            page_size: self.catalog.page_size,
            report_type_id: self.api.report_type_id,
            combined_sources: self.catalog.combined_sources.clone(),
            combined_max_pages: self.catalog.combined_max_pages,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }
}
