//! Impact analysis vocabulary: categories, captured media, image handles
//! and the result contract of the analysis engine.

mod category;
mod image;
mod media;
mod result;

pub use category::{ItemCategory, MainCategory};
pub use image::ImageHandle;
pub use media::{CapturedMedia, MediumTag};
pub use result::{AnalysisResult, BoundingBox, CarbonScore, DetectedItem, MAX_CARBON_SCORE};

#[cfg(test)]
pub(crate) use result::fixtures;
