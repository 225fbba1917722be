//! Gemini Visualizer - renders the "eco-mirror" diorama for a finished analysis.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::gemini_client::{Content, GeminiClient, GenerateContentRequest, Part};
use crate::domain::impact::{CarbonScore, ImageHandle};
use crate::ports::{VisualizationError, Visualizer};

/// Mood of the generated scene, chosen from the carbon score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 0-30
    Lush,
    /// 31-69
    Balanced,
    /// 70-100
    Industrial,
}

impl ScoreBand {
    pub fn for_score(score: CarbonScore) -> Self {
        match score.value() {
            0..=30 => ScoreBand::Lush,
            31..=69 => ScoreBand::Balanced,
            _ => ScoreBand::Industrial,
        }
    }

    fn scene(&self) -> &'static str {
        match self {
            ScoreBand::Lush => {
                "a floating island with vibrant lush greenery, trees, clear water, blooming flowers and birds"
            }
            ScoreBand::Balanced => {
                "a balance of clean technology, electric infrastructure, wind turbines and some nature"
            }
            ScoreBand::Industrial => {
                "a darker industrial platform with smoke, waste piles and red warning lights, artistically rendered"
            }
        }
    }
}

/// Builds the image prompt for `summary` at `score`.
pub fn visualization_prompt(summary: &str, score: CarbonScore) -> String {
    format!(
        "Create a stunning 3D isometric diorama visualization representing this activity: \"{summary}\".\n\
         Carbon Impact Score: {score}/100 (Lower is better).\n\
         The image should abstractly represent the carbon footprint impact in a \"digital collectible\" style.\n\
         Visual Style: High-quality 3D render, isometric view, claymorphism, soft studio lighting, minimalist.\n\
         Show {scene}.\n\
         The background should be a solid, soft color to match the mood. Make it look like a premium 3D icon.",
        summary = summary,
        score = score.value(),
        scene = ScoreBand::for_score(score).scene(),
    )
}

/// Gemini-backed image generator.
pub struct GeminiVisualizer {
    client: Arc<GeminiClient>,
}

impl GeminiVisualizer {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }

    fn build_request(summary: &str, score: CarbonScore) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(visualization_prompt(
                summary, score,
            ))])],
            system_instruction: None,
            generation_config: None,
        }
    }
}

#[async_trait]
impl Visualizer for GeminiVisualizer {
    async fn visualize(
        &self,
        summary: &str,
        score: CarbonScore,
    ) -> Result<ImageHandle, VisualizationError> {
        let model = self.client.config().image_model.clone();
        debug!(model = %model, score = score.value(), "Requesting visualization");

        let request = Self::build_request(summary, score);
        let response = self.client.generate(&model, &request).await?;
        let inline = response
            .first_inline_data()
            .ok_or(VisualizationError::NoImage)?;

        Ok(ImageHandle::data_uri(&inline.mime_type, &inline.data))
    }
}
