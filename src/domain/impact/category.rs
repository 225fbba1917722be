//! Closed category enumerations returned by the impact analysis engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main activity category of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    Waste,
    Transport,
    Food,
    Energy,
    Lifestyle,
}

impl MainCategory {
    /// Every category, in the order the engine schema lists them.
    pub const ALL: [MainCategory; 5] = [
        MainCategory::Waste,
        MainCategory::Transport,
        MainCategory::Food,
        MainCategory::Energy,
        MainCategory::Lifestyle,
    ];

    /// Wire name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            MainCategory::Waste => "Waste",
            MainCategory::Transport => "Transport",
            MainCategory::Food => "Food",
            MainCategory::Energy => "Energy",
            MainCategory::Lifestyle => "Lifestyle",
        }
    }
}

impl fmt::Display for MainCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disposal or activity class of a single detected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    Recyclable,
    Compostable,
    Landfill,
    Hazardous,
    Reusable,
    Other,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 6] = [
        ItemCategory::Recyclable,
        ItemCategory::Compostable,
        ItemCategory::Landfill,
        ItemCategory::Hazardous,
        ItemCategory::Reusable,
        ItemCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemCategory::Recyclable => "Recyclable",
            ItemCategory::Compostable => "Compostable",
            ItemCategory::Landfill => "Landfill",
            ItemCategory::Hazardous => "Hazardous",
            ItemCategory::Reusable => "Reusable",
            ItemCategory::Other => "Other",
        }
    }
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
