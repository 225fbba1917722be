//! Handle to a generated visualization image.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Opaque reference to a generated image: a `data:` URI or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Wraps a non-empty image reference.
    pub fn new(reference: impl Into<String>) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ValidationError::empty_field("image_handle"));
        }
        Ok(Self(reference))
    }

    /// Builds a `data:<mime>;base64,<payload>` handle.
    pub fn data_uri(mime_type: &str, base64_payload: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, base64_payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data:")
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_inline() {
            // inline payloads can be megabytes
            let header = self.0.split(',').next().unwrap_or("data:");
            write!(f, "{},…", header)
        } else {
            f.write_str(&self.0)
        }
    }
}
