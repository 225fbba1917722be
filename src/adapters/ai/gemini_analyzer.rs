//! Gemini Impact Analyzer - ImpactAnalyzer backed by Gemini structured output.
//!
//! Media is sent as base64 inline data; free text goes in as a quoted
//! activity description. The model must answer with JSON matching
//! `analysis_schema()`, which is decoded straight into `AnalysisResult`.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use tracing::debug;

use super::gemini_client::{Content, GeminiClient, GenerateContentRequest, GenerationConfig, Part};
use crate::domain::impact::{AnalysisResult, ItemCategory, MainCategory};
use crate::ports::{AnalysisError, ImpactAnalyzer};

const SYSTEM_INSTRUCTION: &str =
    "You are a helpful, encouraging sustainability expert. Be precise but friendly.";

const ANALYSIS_PROMPT: &str = "\
Analyze this input (image, video, audio, or text description) for environmental impact.
You are an expert Eco-Impact Analyzer.

1. Classify the activity into one of: Waste (recycling/trash), Transport (commute/travel), Food (meals/diet), Energy (electronics/lights), or Lifestyle.
2. If it's waste: Identify items, recyclability.
3. If it's transport/food/energy: Analyze the activity and estimate impact based on standard emission factors.

Provide a carbon footprint estimate (0-100 scale where 100 is bad).
For images, provide bounding boxes for distinct items if possible.";

const TEXT_MIME: &str = "text/plain";

/// Response schema handed to the model.
pub fn analysis_schema() -> serde_json::Value {
    let main_categories: Vec<&str> = MainCategory::ALL.iter().map(|c| c.as_str()).collect();
    let item_categories: Vec<&str> = ItemCategory::ALL.iter().map(|c| c.as_str()).collect();

    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A concise summary of the analyzed content and its environmental context."
            },
            "mainCategory": {
                "type": "STRING",
                "enum": main_categories,
                "description": "Classify the main activity into one of these categories."
            },
            "totalCarbonScore": {
                "type": "NUMBER",
                "description": "An estimated impact score from 0 (Eco-friendly) to 100 (High Carbon Footprint)."
            },
            "generalTips": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of general actionable eco-tips based on the analysis."
            },
            "items": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "id": { "type": "STRING", "description": "Unique identifier for the item." },
                        "name": { "type": "STRING", "description": "Name of the detected object or activity." },
                        "category": {
                            "type": "STRING",
                            "enum": item_categories,
                            "description": "The waste category or activity type."
                        },
                        "carbonFootprint": { "type": "NUMBER", "description": "Estimated carbon impact in grams of CO2e." },
                        "impactDescription": { "type": "STRING", "description": "Short explanation of why this has this impact." },
                        "suggestion": { "type": "STRING", "description": "Specific tip to optimize this item." },
                        "box": {
                            "type": "OBJECT",
                            "description": "Bounding box coordinates 0-1. Only applicable if identifying specific objects in a static image.",
                            "properties": {
                                "ymin": { "type": "NUMBER" },
                                "xmin": { "type": "NUMBER" },
                                "ymax": { "type": "NUMBER" },
                                "xmax": { "type": "NUMBER" }
                            }
                        }
                    },
                    "required": ["id", "name", "category", "carbonFootprint", "impactDescription", "suggestion"]
                }
            }
        },
        "required": ["summary", "mainCategory", "totalCarbonScore", "items", "generalTips"]
    })
}

/// Gemini-backed impact analyzer.
pub struct GeminiImpactAnalyzer {
    client: Arc<GeminiClient>,
}

impl GeminiImpactAnalyzer {
    pub fn new(client: Arc<GeminiClient>) -> Self {
        Self { client }
    }

    fn build_request(content: &[u8], mime_hint: &str) -> GenerateContentRequest {
        let media_part = if mime_hint == TEXT_MIME {
            Part::text(format!(
                "User Activity Description: \"{}\"",
                String::from_utf8_lossy(content)
            ))
        } else {
            Part::inline(mime_hint, STANDARD.encode(content))
        };

        GenerateContentRequest {
            contents: vec![Content::user(vec![media_part, Part::text(ANALYSIS_PROMPT)])],
            system_instruction: Some(Content::system(SYSTEM_INSTRUCTION)),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: analysis_schema(),
            }),
        }
    }

    /// Decodes the model's JSON answer.
    ///
    /// Malformed JSON is a parse error; well-formed JSON that breaks the
    /// result contract (unknown category, score out of range, missing
    /// field) is a contract violation.
    pub fn decode_result(text: &str) -> Result<AnalysisResult, AnalysisError> {
        let raw: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| AnalysisError::parse(format!("Response is not JSON: {}", e)))?;
        serde_json::from_value(raw).map_err(|e| AnalysisError::contract(e.to_string()))
    }
}

#[async_trait]
impl ImpactAnalyzer for GeminiImpactAnalyzer {
    async fn analyze(
        &self,
        content: &[u8],
        mime_hint: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let model = self.client.config().analysis_model.clone();
        debug!(model = %model, mime_hint, bytes = content.len(), "Requesting impact analysis");

        let request = Self::build_request(content, mime_hint);
        let response = self.client.generate(&model, &request).await?;
        let text = response
            .text()
            .ok_or_else(|| AnalysisError::parse("No response text from Gemini"))?;

        Self::decode_result(&text)
    }
}
