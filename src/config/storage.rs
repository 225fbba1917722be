//! Profile storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::adapters::storage::DEFAULT_RECORD_FILE;

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the profile record
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Record file name inside `data_dir`
    #[serde(default = "default_record_file")]
    pub record_file: String,
}

impl StorageConfig {
    /// Full path of the record file
    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(&self.record_file)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        if self.record_file.trim().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__RECORD_FILE"));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            record_file: default_record_file(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_record_file() -> String {
    DEFAULT_RECORD_FILE.to_string()
}
