//! Versioned storage record for a profile, with schema upcasting.
//!
//! The stored shape is `{ "schemaVersion": N, "profile": { ... } }`.
//! Records written before versioning existed are a bare profile object and
//! count as version 0.
//!
//! - `ProfileUpcaster` - transforms a record one version step forward
//! - `ProfileMigrator` - chains upcasters up to `CURRENT_SCHEMA_VERSION`

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::UserProfile;

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Errors that can occur while upgrading a stored record.
#[derive(Debug, Error)]
pub enum UpcastError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field value: {0}")]
    InvalidValue(String),

    #[error("record schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("no upcaster registered for schema version {0}")]
    MissingUpcaster(u32),

    #[error("JSON transformation error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// The whole durable record. Replaced wholesale on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub schema_version: u32,
    pub profile: UserProfile,
}

impl ProfileRecord {
    /// Wraps a profile at the current schema version.
    pub fn current(profile: UserProfile) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            profile,
        }
    }
}

/// Transforms a raw record from `source_version` to `source_version + 1`.
///
/// Upcasters must be deterministic and must not fail silently: a record that
/// cannot be upgraded is an error, never a default profile.
pub trait ProfileUpcaster: Send + Sync {
    fn source_version(&self) -> u32;

    fn upcast(&self, record: JsonValue) -> Result<JsonValue, UpcastError>;
}

/// Version 0 → 1: wrap the bare profile in the versioned envelope, default
/// `isGuest` to false and backfill `pointsEarned` on any entry lacking it.
pub struct BareProfileToV1;

impl ProfileUpcaster for BareProfileToV1 {
    fn source_version(&self) -> u32 {
        0
    }

    fn upcast(&self, mut record: JsonValue) -> Result<JsonValue, UpcastError> {
        let profile = record
            .as_object_mut()
            .ok_or_else(|| UpcastError::InvalidValue("profile must be an object".to_string()))?;

        if !profile.contains_key("id") {
            return Err(UpcastError::MissingField("id".to_string()));
        }
        profile
            .entry("isGuest")
            .or_insert(JsonValue::Bool(false));

        if let Some(logs) = profile.get_mut("logs").and_then(JsonValue::as_array_mut) {
            for log in logs.iter_mut() {
                backfill_points(log)?;
            }
        }

        Ok(json!({
            "schemaVersion": 1,
            "profile": record,
        }))
    }
}

fn backfill_points(log: &mut JsonValue) -> Result<(), UpcastError> {
    let entry = log
        .as_object_mut()
        .ok_or_else(|| UpcastError::InvalidValue("log entry must be an object".to_string()))?;
    if entry.contains_key("pointsEarned") {
        return Ok(());
    }
    let score = entry
        .get("result")
        .and_then(|result| result.get("totalCarbonScore"))
        .and_then(JsonValue::as_f64)
        .ok_or_else(|| UpcastError::MissingField("result.totalCarbonScore".to_string()))?;
    let points = (100.0 - score.round()).max(10.0) as u64;
    entry.insert("pointsEarned".to_string(), JsonValue::from(points));
    Ok(())
}

/// Chains registered upcasters to bring any stored record to the current
/// schema version.
pub struct ProfileMigrator {
    upcasters: HashMap<u32, Arc<dyn ProfileUpcaster>>,
    target_version: u32,
}

impl ProfileMigrator {
    /// Creates an empty migrator targeting `target_version`.
    pub fn new(target_version: u32) -> Self {
        Self {
            upcasters: HashMap::new(),
            target_version,
        }
    }

    pub fn register(&mut self, upcaster: Arc<dyn ProfileUpcaster>) {
        self.upcasters.insert(upcaster.source_version(), upcaster);
    }

    /// Schema version of a raw record; bare profiles are version 0.
    pub fn detect_version(record: &JsonValue) -> u32 {
        record
            .get("schemaVersion")
            .and_then(JsonValue::as_u64)
            .map(|v| v as u32)
            .unwrap_or(0)
    }

    /// Upgrades `record` step by step and decodes it.
    pub fn decode(&self, mut record: JsonValue) -> Result<ProfileRecord, UpcastError> {
        let mut version = Self::detect_version(&record);
        if version > self.target_version {
            return Err(UpcastError::UnsupportedVersion {
                found: version,
                supported: self.target_version,
            });
        }

        while version < self.target_version {
            let upcaster = self
                .upcasters
                .get(&version)
                .ok_or(UpcastError::MissingUpcaster(version))?;
            record = upcaster.upcast(record)?;
            let next = Self::detect_version(&record);
            if next != version + 1 {
                return Err(UpcastError::InvalidValue(format!(
                    "upcaster from v{} produced v{}",
                    version, next
                )));
            }
            version = next;
        }

        Ok(serde_json::from_value(record)?)
    }
}

impl Default for ProfileMigrator {
    fn default() -> Self {
        let mut migrator = Self::new(CURRENT_SCHEMA_VERSION);
        migrator.register(Arc::new(BareProfileToV1));
        migrator
    }
}
