//! Captured media handed over by the acquisition layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::foundation::ValidationError;

/// How the input was captured. Chosen by the capture path, never sniffed
/// from content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumTag {
    Image,
    Video,
    Audio,
    Text,
}

impl MediumTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediumTag::Image => "image",
            MediumTag::Video => "video",
            MediumTag::Audio => "audio",
            MediumTag::Text => "text",
        }
    }

    /// MIME type assumed when the capture layer did not declare one.
    pub fn default_mime(&self) -> &'static str {
        match self {
            MediumTag::Image => "image/jpeg",
            MediumTag::Video => "video/mp4",
            MediumTag::Audio => "audio/webm",
            MediumTag::Text => "text/plain",
        }
    }

    /// Only static images can carry bounding boxes.
    pub fn supports_bounding_boxes(&self) -> bool {
        matches!(self, MediumTag::Image)
    }
}

impl fmt::Display for MediumTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediumTag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(MediumTag::Image),
            "video" => Ok(MediumTag::Video),
            "audio" => Ok(MediumTag::Audio),
            "text" => Ok(MediumTag::Text),
            other => Err(ValidationError::invalid_format(
                "medium",
                format!("unknown medium '{}'", other),
            )),
        }
    }
}

/// An input blob plus the tag describing how it was captured.
///
/// The bytes are reference counted so an in-flight analysis call can hold
/// them; the last holder dropping its handle releases the buffer.
#[derive(Debug, Clone)]
pub struct CapturedMedia {
    content: Arc<[u8]>,
    medium: MediumTag,
    declared_mime: Option<String>,
}

impl CapturedMedia {
    /// Wraps raw bytes captured through `medium`.
    pub fn new(content: impl Into<Arc<[u8]>>, medium: MediumTag) -> Self {
        Self {
            content: content.into(),
            medium,
            declared_mime: None,
        }
    }

    /// Free-text activity description.
    pub fn text(description: impl Into<String>) -> Self {
        let bytes: Vec<u8> = description.into().into_bytes();
        Self::new(bytes, MediumTag::Text)
    }

    /// Records the MIME type the capture layer saw (e.g. a file's type).
    pub fn with_declared_mime(mut self, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        if !mime.trim().is_empty() {
            self.declared_mime = Some(mime);
        }
        self
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Shared handle to the bytes.
    pub fn shared_content(&self) -> Arc<[u8]> {
        Arc::clone(&self.content)
    }

    pub fn medium(&self) -> MediumTag {
        self.medium
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// MIME hint passed to the analysis engine.
    ///
    /// Text is always `text/plain`; other media use the declared type when
    /// present and fall back to the medium's default.
    pub fn mime_hint(&self) -> String {
        match (self.medium, &self.declared_mime) {
            (MediumTag::Text, _) => MediumTag::Text.default_mime().to_string(),
            (_, Some(mime)) => mime.clone(),
            (medium, None) => medium.default_mime().to_string(),
        }
    }
}
