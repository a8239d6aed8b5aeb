//! Crop batch models

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized crop type name (e.g. `LETTUCE`)
///
/// Stored uppercase so that `"lettuce"`, `" Lettuce "` and `"LETTUCE"` all
/// refer to the same crop.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CropType(String);

impl CropType {
    pub const LETTUCE: &'static str = "LETTUCE";
    pub const ARUGULA: &'static str = "ARUGULA";
    pub const SPINACH: &'static str = "SPINACH";
    pub const KALE: &'static str = "KALE";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leafy greens planned when the caller does not name any crop types
    pub fn defaults() -> Vec<CropType> {
        [Self::LETTUCE, Self::ARUGULA, Self::SPINACH, Self::KALE]
            .into_iter()
            .map(CropType::new)
            .collect()
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CropType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CropType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CropType> for String {
    fn from(value: CropType) -> Self {
        value.0
    }
}

/// Slot of a crop batch inside a greenhouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreenhouseLocation {
    pub house_number: i32,
    pub x_position: i32,
    pub y_position: i32,
}

/// A crop batch that can be harvested on a given date, with its ML prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestCandidate {
    /// Crop cycle identifier
    pub id: i64,
    pub crop: CropType,
    /// Sub-variety (e.g. "Butter Crunch")
    pub sub_crop: Option<String>,
    pub num_plants: i32,
    /// Predicted yield in grams
    pub predicted_yield_g: f64,
    /// Model confidence (0.0-1.0)
    pub confidence_score: f64,
    pub location: GreenhouseLocation,
}

impl HarvestCandidate {
    pub fn meets_confidence(&self, min_confidence: f64) -> bool {
        self.confidence_score >= min_confidence
    }
}
