//! Harvest selection and availability models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CropType, HarvestCandidate};

/// Default daily yield target per crop type (4 kg)
pub const DEFAULT_TARGET_YIELD_G: f64 = 4000.0;

/// Default minimum model confidence for a batch to be considered
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.8;

/// Which branch of the selector produced a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// No candidate passed the confidence filter
    None,
    /// One batch covers the whole target on its own
    SingleBatch,
    /// Several batches accumulated by confidence until the target was reached
    MultiBatch,
}

/// Batches chosen for one (date, crop type) harvest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestSelection {
    pub target_date: NaiveDate,
    pub crop_type: CropType,
    pub target_yield_g: f64,
    /// In selection order
    pub selected_crops: Vec<HarvestCandidate>,
    pub total_predicted_yield_g: f64,
    /// Confidence of the single batch, or mean confidence of all selected batches
    pub confidence_score: f64,
    pub strategy: SelectionStrategy,
}

impl HarvestSelection {
    pub fn empty(target_date: NaiveDate, crop_type: CropType, target_yield_g: f64) -> Self {
        Self {
            target_date,
            crop_type,
            target_yield_g,
            selected_crops: Vec::new(),
            total_predicted_yield_g: 0.0,
            confidence_score: 0.0,
            strategy: SelectionStrategy::None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected_crops.is_empty()
    }

    pub fn meets_target(&self) -> bool {
        self.total_predicted_yield_g >= self.target_yield_g
    }

    /// Grams still missing to reach the target (0 when met)
    pub fn shortfall_g(&self) -> f64 {
        (self.target_yield_g - self.total_predicted_yield_g).max(0.0)
    }

    pub fn selected_ids(&self) -> Vec<i64> {
        self.selected_crops.iter().map(|c| c.id).collect()
    }
}

/// Aggregate view of the eligible batches of one crop type on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropAvailabilitySummary {
    pub crop: CropType,
    pub available_crops: usize,
    pub avg_yield_g: f64,
    pub avg_confidence: f64,
    pub max_yield_g: f64,
}

/// Totals across every crop type in an [`AvailableCrops`] listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityTotals {
    pub total_available_crops: usize,
    pub total_predicted_yield_g: f64,
    pub total_predicted_yield_kg: f64,
}

/// Candidates for a date grouped by crop type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableCrops {
    pub date: NaiveDate,
    /// Each list is ordered by confidence, then yield, highest first
    pub crops: BTreeMap<CropType, Vec<HarvestCandidate>>,
    pub summary: AvailabilityTotals,
}

/// Selections for the harvest days of one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyHarvestPlan {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub daily_schedules: Vec<HarvestSelection>,
}

/// Request body for scheduling one harvest
///
/// Omitted numbers fall back to the server's configured planning defaults.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScheduleHarvestRequest {
    pub target_date: NaiveDate,
    pub crop_type: CropType,
    #[serde(default)]
    pub target_yield_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_confidence: Option<f64>,
}

/// Request body for selecting and committing one crop type on a plan date
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommitSelectionRequest {
    pub crop_type: CropType,
    #[serde(default)]
    pub target_yield_g: Option<f64>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub min_confidence: Option<f64>,
}
