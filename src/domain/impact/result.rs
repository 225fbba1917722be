//! Analysis result value objects and their data contract.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::{ItemCategory, MainCategory, MediumTag};
use crate::domain::foundation::ValidationError;

/// Highest (worst) carbon score the engine may return.
pub const MAX_CARBON_SCORE: u8 = 100;

/// Integer impact estimate in `[0, 100]`; lower is better.
///
/// Deserializes from any JSON number: fractional engine output is rounded to
/// the nearest integer, anything outside the range is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u8")]
pub struct CarbonScore(u8);

impl CarbonScore {
    /// Creates a score, returning error if above 100.
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value > MAX_CARBON_SCORE {
            return Err(ValidationError::out_of_range(
                "total_carbon_score",
                0,
                i64::from(MAX_CARBON_SCORE),
                i64::from(value),
            ));
        }
        Ok(Self(value))
    }

    /// Creates a score, clamping anything above 100 to 100.
    pub const fn saturating(value: u8) -> Self {
        if value > MAX_CARBON_SCORE {
            Self(MAX_CARBON_SCORE)
        } else {
            Self(value)
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<f64> for CarbonScore {
    type Error = ValidationError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        if !raw.is_finite() {
            return Err(ValidationError::invalid_format(
                "total_carbon_score",
                "score must be a finite number",
            ));
        }
        let rounded = raw.round();
        if !(0.0..=f64::from(MAX_CARBON_SCORE)).contains(&rounded) {
            return Err(ValidationError::out_of_range(
                "total_carbon_score",
                0,
                i64::from(MAX_CARBON_SCORE),
                rounded as i64,
            ));
        }
        Ok(Self(rounded as u8))
    }
}

impl From<CarbonScore> for u8 {
    fn from(score: CarbonScore) -> Self {
        score.0
    }
}

impl fmt::Display for CarbonScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/100", self.0)
    }
}

/// Normalized bounding box, all coordinates in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub ymin: f64,
    pub xmin: f64,
    pub ymax: f64,
    pub xmax: f64,
}

impl BoundingBox {
    /// Checks range and ordering of the coordinates.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("ymin", self.ymin),
            ("xmin", self.xmin),
            ("ymax", self.ymax),
            ("xmax", self.xmax),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::invalid_format(
                    "box",
                    format!("{} = {} is outside [0, 1]", name, value),
                ));
            }
        }
        if self.ymin > self.ymax || self.xmin > self.xmax {
            return Err(ValidationError::invalid_format(
                "box",
                "min coordinate exceeds max coordinate",
            ));
        }
        Ok(())
    }
}

/// One contributing factor found in the analyzed media.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedItem {
    /// Unique within the parent result only.
    pub id: String,
    pub name: String,
    pub category: ItemCategory,
    /// Grams of CO2e, non-negative.
    pub carbon_footprint: f64,
    pub impact_description: String,
    pub suggestion: String,
    #[serde(rename = "box", default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// Output of the impact analysis engine. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub main_category: MainCategory,
    pub total_carbon_score: CarbonScore,
    #[serde(default)]
    pub items: Vec<DetectedItem>,
    #[serde(default)]
    pub general_tips: Vec<String>,
}

impl AnalysisResult {
    /// Enforces the data contract for a result produced from `medium`.
    ///
    /// Rejects empty summaries, empty or duplicate item ids, negative or
    /// non-finite footprints and malformed boxes. Boxes attached to anything
    /// other than a static image are dropped.
    pub fn validated_for(mut self, medium: MediumTag) -> Result<Self, ValidationError> {
        if self.summary.trim().is_empty() {
            return Err(ValidationError::empty_field("summary"));
        }

        let mut seen = HashSet::new();
        for item in &mut self.items {
            if item.id.trim().is_empty() {
                return Err(ValidationError::empty_field("items.id"));
            }
            if !seen.insert(item.id.clone()) {
                return Err(ValidationError::invalid_format(
                    "items.id",
                    format!("duplicate item id '{}'", item.id),
                ));
            }
            if !item.carbon_footprint.is_finite() || item.carbon_footprint < 0.0 {
                return Err(ValidationError::invalid_format(
                    "items.carbon_footprint",
                    format!("'{}' has footprint {}", item.id, item.carbon_footprint),
                ));
            }
            if !medium.supports_bounding_boxes() {
                item.bounding_box = None;
            } else if let Some(bbox) = &item.bounding_box {
                bbox.validate()?;
            }
        }

        Ok(self)
    }

    /// Total grams of CO2e across detected items.
    pub fn total_footprint_grams(&self) -> f64 {
        self.items.iter().map(|item| item.carbon_footprint).sum()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn valid_box() -> BoundingBox {
        BoundingBox {
            ymin: 0.1,
            xmin: 0.2,
            ymax: 0.5,
            xmax: 0.6,
        }
    }

    #[test]
    fn carbon_score_rejects_above_100() {
        assert!(CarbonScore::new(100).is_ok());
        assert!(CarbonScore::new(101).is_err());
    }

    #[test]
    fn carbon_score_saturates() {
        assert_eq!(CarbonScore::saturating(250).value(), 100);
        assert_eq!(CarbonScore::saturating(42).value(), 42);
    }

    #[test]
    fn carbon_score_rounds_fractional_engine_output() {
        let score: CarbonScore = serde_json::from_str("42.6").unwrap();
        assert_eq!(score.value(), 43);
    }

    #[test]
    fn carbon_score_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<CarbonScore>("-3").is_err());
        assert!(serde_json::from_str::<CarbonScore>("140").is_err());
    }

    #[test]
    fn carbon_score_serializes_as_integer() {
        let score = CarbonScore::new(20).unwrap();
        assert_eq!(serde_json::to_string(&score).unwrap(), "20");
    }

    #[test]
    fn result_deserializes_engine_json() {
        let json = r#"{
            "summary": "Bus commute",
            "mainCategory": "Transport",
            "totalCarbonScore": 35,
            "items": [{
                "id": "bus",
                "name": "City bus",
                "category": "Other",
                "carbonFootprint": 820.0,
                "impactDescription": "Shared diesel transport",
                "suggestion": "Try cycling on dry days"
            }],
            "generalTips": ["Off-peak travel is less crowded"]
        }"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.main_category, MainCategory::Transport);
        assert_eq!(result.items[0].bounding_box, None);
        assert_eq!(result.total_carbon_score.value(), 35);
    }

    #[test]
    fn result_with_unknown_category_fails_to_parse() {
        let json = r#"{"summary":"x","mainCategory":"Travel","totalCarbonScore":1,"items":[],"generalTips":[]}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn validated_keeps_boxes_for_images() {
        let mut result = result(MainCategory::Waste, 20);
        result.items[0].bounding_box = Some(valid_box());
        let result = result.validated_for(MediumTag::Image).unwrap();
        assert_eq!(result.items[0].bounding_box, Some(valid_box()));
    }

    #[test]
    fn validated_drops_boxes_for_video() {
        let mut result = result(MainCategory::Waste, 20);
        result.items[0].bounding_box = Some(valid_box());
        let result = result.validated_for(MediumTag::Video).unwrap();
        assert_eq!(result.items[0].bounding_box, None);
    }

    #[test]
    fn validated_rejects_inverted_box() {
        let mut result = result(MainCategory::Waste, 20);
        result.items[0].bounding_box = Some(BoundingBox {
            ymin: 0.8,
            xmin: 0.1,
            ymax: 0.2,
            xmax: 0.3,
        });
        assert!(result.validated_for(MediumTag::Image).is_err());
    }

    #[test]
    fn validated_rejects_box_outside_unit_square() {
        let mut result = result(MainCategory::Waste, 20);
        result.items[0].bounding_box = Some(BoundingBox {
            ymin: 0.0,
            xmin: 0.0,
            ymax: 1.2,
            xmax: 0.3,
        });
        assert!(result.validated_for(MediumTag::Image).is_err());
    }

    #[test]
    fn validated_rejects_duplicate_item_ids() {
        let mut result = result(MainCategory::Food, 50);
        result.items.push(item("1", 3.0));
        assert!(result.validated_for(MediumTag::Image).is_err());
    }

    #[test]
    fn validated_rejects_negative_footprint() {
        let mut result = result(MainCategory::Food, 50);
        result.items[0].carbon_footprint = -1.0;
        assert!(result.validated_for(MediumTag::Text).is_err());
    }

    #[test]
    fn validated_rejects_blank_summary() {
        let mut result = result(MainCategory::Energy, 10);
        result.summary = "  ".to_string();
        assert!(result.validated_for(MediumTag::Text).is_err());
    }

    #[test]
    fn total_footprint_sums_items() {
        let mut result = result(MainCategory::Waste, 20);
        result.items.push(item("2", 7.5));
        assert!((result.total_footprint_grams() - 20.0).abs() < f64::EPSILON);
    }
}
