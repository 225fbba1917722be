//! File-based Profile Store Adapter
//!
//! Stores the identified profile as one YAML file. Every write replaces the
//! whole record by writing a sibling temp file and renaming it over the old
//! one, so a crash mid-write leaves the previous record intact.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::profile::{ProfileMigrator, ProfileRecord, UserProfile};
use crate::ports::{ProfileStore, ProfileStoreError};

/// Default record file name inside the data directory.
pub const DEFAULT_RECORD_FILE: &str = "profile.yaml";

/// File-based storage for the profile record.
pub struct FileProfileStore {
    base_path: PathBuf,
    file_name: String,
    migrator: ProfileMigrator,
}

impl FileProfileStore {
    /// Create a store keeping `profile.yaml` under `base_path`.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileProfileStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self::with_file_name(base_path, DEFAULT_RECORD_FILE)
    }

    /// Create a store with a custom record file name.
    pub fn with_file_name<P: AsRef<Path>>(base_path: P, file_name: impl Into<String>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            file_name: file_name.into(),
            migrator: ProfileMigrator::default(),
        }
    }

    /// Path of the record file.
    pub fn record_path(&self) -> PathBuf {
        self.base_path.join(&self.file_name)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.tmp", self.file_name))
    }

    async fn ensure_dir(&self) -> Result<(), ProfileStoreError> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FileProfileStore {
    async fn load(&self) -> Result<Option<UserProfile>, ProfileStoreError> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&path).await?;
        let raw: serde_json::Value = serde_yaml::from_str(&yaml)
            .map_err(|e| ProfileStoreError::Deserialization(e.to_string()))?;
        let record = self.migrator.decode(raw)?;

        debug!(
            path = %path.display(),
            user_id = %record.profile.id(),
            logs = record.profile.log_count(),
            "Loaded profile record"
        );
        Ok(Some(record.profile))
    }

    async fn replace(&self, profile: &UserProfile) -> Result<(), ProfileStoreError> {
        if profile.is_guest() {
            return Err(ProfileStoreError::GuestNotPersistable(profile.id().clone()));
        }
        self.ensure_dir().await?;

        let yaml = serde_yaml::to_string(&ProfileRecord::current(profile.clone()))
            .map_err(|e| ProfileStoreError::Serialization(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, yaml).await?;
        fs::rename(&temp, self.record_path()).await?;

        debug!(
            user_id = %profile.id(),
            points = profile.total_points(),
            logs = profile.log_count(),
            "Replaced profile record"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), ProfileStoreError> {
        let path = self.record_path();
        if path.exists() {
            fs::remove_file(&path).await?;
            debug!(path = %path.display(), "Cleared profile record");
        }
        Ok(())
    }
}
