//! CLI Commands

pub mod config;
pub mod surveys;
pub mod zip;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use survey_intake::{HttpSurveyStore, SurveyRecordSync, SyncConfig, ZipDataset, ZipIndex};

use crate::output::OutputFormat;

/// Settings shared by every command
pub struct Context {
    pub config: SyncConfig,
    pub format: OutputFormat,
}

impl Context {
    pub fn new(config: SyncConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Sync service over the HTTP record store
    pub fn sync(&self) -> Result<SurveyRecordSync, String> {
        let store = HttpSurveyStore::new(&self.config).map_err(|e| e.to_string())?;
        Ok(SurveyRecordSync::new(Arc::new(store)))
    }

    /// Dataset path from the flag, else from config
    pub fn zip_dataset(&self, flag: Option<PathBuf>) -> Option<PathBuf> {
        flag.or_else(|| self.config.zip_dataset.clone())
    }
}

/// Index for form auto-fill. A missing or unreadable dataset only disables
/// auto-fill.
pub fn auto_fill_index(path: Option<&Path>) -> ZipIndex {
    match path {
        Some(path) => ZipDataset::load_or_empty(path),
        None => {
            tracing::warn!("no zip dataset configured; city/state auto-fill disabled");
            ZipIndex::empty()
        }
    }
}
