//! Committed harvest plan models

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CropType, HarvestCandidate};
use crate::types::{grams_to_kg, round_to};

/// A batch accepted into the harvest plan of a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommittedPlanEntry {
    pub id: i64,
    pub target_date: NaiveDate,
    pub crop_cycle_id: i64,
    pub crop_type: CropType,
    pub sub_crop: Option<String>,
    pub planned_yield_g: f64,
    pub confidence_score: f64,
    pub house_number: i32,
    pub location_x: i32,
    pub location_y: i32,
    pub created_at: DateTime<Utc>,
}

/// Candidate attributes copied into the plan at commit time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlanEntry {
    pub crop_cycle_id: i64,
    pub crop_type: CropType,
    #[serde(default)]
    pub sub_crop: Option<String>,
    pub planned_yield_g: f64,
    pub confidence_score: f64,
    pub house_number: i32,
    pub location_x: i32,
    pub location_y: i32,
}

impl NewPlanEntry {
    pub fn into_committed(self, id: i64, target_date: NaiveDate) -> CommittedPlanEntry {
        CommittedPlanEntry {
            id,
            target_date,
            crop_cycle_id: self.crop_cycle_id,
            crop_type: self.crop_type,
            sub_crop: self.sub_crop,
            planned_yield_g: self.planned_yield_g,
            confidence_score: self.confidence_score,
            house_number: self.house_number,
            location_x: self.location_x,
            location_y: self.location_y,
            created_at: Utc::now(),
        }
    }
}

impl From<&HarvestCandidate> for NewPlanEntry {
    fn from(candidate: &HarvestCandidate) -> Self {
        Self {
            crop_cycle_id: candidate.id,
            crop_type: candidate.crop.clone(),
            sub_crop: candidate.sub_crop.clone(),
            planned_yield_g: candidate.predicted_yield_g,
            confidence_score: candidate.confidence_score,
            house_number: candidate.location.house_number,
            location_x: candidate.location.x_position,
            location_y: candidate.location.y_position,
        }
    }
}

/// Progress of one crop type toward the daily target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProgress {
    pub current_g: f64,
    pub current_kg: f64,
    pub target_g: f64,
    pub target_kg: f64,
    /// Capped at 100
    pub progress_percent: f64,
    pub count: usize,
}

/// Totals of a committed plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_items: usize,
    pub total_yield_g: f64,
    pub total_yield_kg: f64,
    pub target_progress: BTreeMap<CropType, TargetProgress>,
}

impl PlanSummary {
    /// Summarize entries against a per-crop-type daily target
    pub fn from_entries(entries: &[CommittedPlanEntry], daily_target_g: f64) -> Self {
        let mut by_crop: BTreeMap<CropType, (usize, f64)> = BTreeMap::new();
        let mut total_yield_g = 0.0;

        for entry in entries {
            total_yield_g += entry.planned_yield_g;
            let slot = by_crop.entry(entry.crop_type.clone()).or_insert((0, 0.0));
            slot.0 += 1;
            slot.1 += entry.planned_yield_g;
        }

        let target_progress = by_crop
            .into_iter()
            .map(|(crop, (count, current_g))| {
                let percent = if daily_target_g > 0.0 {
                    (current_g / daily_target_g * 100.0).min(100.0)
                } else {
                    100.0
                };
                let progress = TargetProgress {
                    current_g,
                    current_kg: grams_to_kg(current_g),
                    target_g: daily_target_g,
                    target_kg: daily_target_g / 1000.0,
                    progress_percent: round_to(percent, 1),
                    count,
                };
                (crop, progress)
            })
            .collect();

        Self {
            total_items: entries.len(),
            total_yield_g,
            total_yield_kg: grams_to_kg(total_yield_g),
            target_progress,
        }
    }
}

/// The committed plan of one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    pub items: Vec<CommittedPlanEntry>,
    pub summary: PlanSummary,
}
