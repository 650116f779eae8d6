//! CLI Configuration

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use survey_intake::SyncConfig;

use crate::output::OutputFormat;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub api_url: Option<String>,
    pub zip_dataset: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub default_format: Option<String>,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self, String> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| e.to_string())?;
            toml::from_str(&content).map_err(|e| e.to_string())
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf, String> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(&path, content).map_err(|e| e.to_string())?;
        Ok(path)
    }

    /// Library settings: defaults, then this file, then `SURVEY_API_URL`,
    /// then the `--api-url` flag.
    pub fn sync_config(&self, api_url: Option<&str>) -> SyncConfig {
        let mut sync = SyncConfig::default();
        if let Some(url) = &self.api_url {
            sync.base_url = url.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            sync.timeout_secs = timeout;
        }
        if let Some(retries) = self.max_retries {
            sync.max_retries = retries;
        }
        sync.zip_dataset = self.zip_dataset.clone();

        let mut sync = sync.with_env_overrides();
        if let Some(url) = api_url {
            sync.base_url = url.to_string();
        }
        sync
    }

    pub fn default_format(&self) -> Option<OutputFormat> {
        self.default_format
            .as_deref()
            .and_then(|f| OutputFormat::from_str(f, true).ok())
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf, String> {
        let home = dirs::home_dir().ok_or("Cannot find home directory")?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".survey-intake").join(filename))
    }
}
