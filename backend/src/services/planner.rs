//! Harvest planning service
//!
//! Fetches candidates from a [`CandidateSource`] and runs the selector for
//! single dates, whole weeks and availability overviews.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    group_by_crop, harvest_days, planning_window, select_harvest, summarize_crop,
    AvailableCrops, CropAvailabilitySummary, CropType, HarvestCandidate, HarvestSelection,
    WeeklyHarvestPlan,
};
use tracing::instrument;

use crate::config::PlanningConfig;
use crate::error::AppResult;
use crate::sources::CandidateSource;
use crate::stores::PlanStore;

/// Harvest planner over a candidate source
#[derive(Clone)]
pub struct HarvestPlanner {
    source: Arc<dyn CandidateSource>,
    settings: PlanningConfig,
}

impl HarvestPlanner {
    pub fn new(source: Arc<dyn CandidateSource>, settings: PlanningConfig) -> Self {
        Self { source, settings }
    }

    /// Crop types to plan: the given ones, or the configured defaults when none are given
    pub fn crop_types_or_default(&self, crop_types: Vec<CropType>) -> Vec<CropType> {
        if crop_types.is_empty() {
            self.settings.crop_types()
        } else {
            crop_types
        }
    }

    /// Eligible candidates for a date, optionally limited to one crop type
    pub async fn candidates(
        &self,
        date: NaiveDate,
        crop_type: Option<&CropType>,
    ) -> AppResult<Vec<HarvestCandidate>> {
        self.source.fetch_candidates(date, crop_type).await
    }

    /// Select the batches to harvest for one crop type on one date
    #[instrument(skip(self, crop_type), fields(crop_type = %crop_type))]
    pub async fn schedule_harvest(
        &self,
        date: NaiveDate,
        crop_type: CropType,
        target_yield_g: f64,
        min_confidence: f64,
    ) -> AppResult<HarvestSelection> {
        let candidates = self.source.fetch_candidates(date, Some(&crop_type)).await?;
        let selection = select_harvest(&candidates, date, crop_type, target_yield_g, min_confidence);

        tracing::debug!(
            candidates = candidates.len(),
            selected = selection.selected_crops.len(),
            strategy = ?selection.strategy,
            total_yield_g = selection.total_predicted_yield_g,
            "Harvest selection made"
        );
        if !selection.is_empty() && !selection.meets_target() {
            tracing::debug!(shortfall_g = selection.shortfall_g(), "Target not reachable");
        }

        Ok(selection)
    }

    /// One selection per harvest day and crop type, date-major
    ///
    /// Uses the configured default target yield and minimum confidence.
    pub async fn plan_week(
        &self,
        week_start: NaiveDate,
        crop_types: &[CropType],
    ) -> AppResult<WeeklyHarvestPlan> {
        let days = harvest_days(week_start);
        let mut daily_schedules = Vec::with_capacity(days.len() * crop_types.len());

        for date in days {
            for crop_type in crop_types {
                let selection = self
                    .schedule_harvest(
                        date,
                        crop_type.clone(),
                        self.settings.default_target_yield_g,
                        self.settings.default_min_confidence,
                    )
                    .await?;
                daily_schedules.push(selection);
            }
        }

        tracing::info!(%week_start, selections = daily_schedules.len(), "Planned harvest week");

        Ok(WeeklyHarvestPlan {
            week_start,
            week_end: planning_window(week_start).end,
            daily_schedules,
        })
    }

    /// Weekly plans for several week starts, in the given order
    pub async fn plan_weeks(
        &self,
        week_starts: &[NaiveDate],
        crop_types: &[CropType],
    ) -> AppResult<Vec<WeeklyHarvestPlan>> {
        let mut plans = Vec::with_capacity(week_starts.len());
        for week_start in week_starts {
            plans.push(self.plan_week(*week_start, crop_types).await?);
        }
        Ok(plans)
    }

    /// Availability per crop type; crop types with no candidates are left out
    pub async fn summarize_availability(
        &self,
        date: NaiveDate,
        crop_types: &[CropType],
    ) -> AppResult<Vec<CropAvailabilitySummary>> {
        let mut summaries = Vec::new();
        for crop_type in crop_types {
            let candidates = self.source.fetch_candidates(date, Some(crop_type)).await?;
            if let Some(summary) = summarize_crop(crop_type, &candidates) {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    /// Confident candidates of the configured crop types not yet in the plan of `date`
    pub async fn available_crops(
        &self,
        date: NaiveDate,
        plans: &dyn PlanStore,
    ) -> AppResult<AvailableCrops> {
        let planned: HashSet<i64> = plans
            .list_entries(date)
            .await?
            .into_iter()
            .map(|e| e.crop_cycle_id)
            .collect();
        let crop_types: HashSet<CropType> = self.settings.crop_types().into_iter().collect();
        let min_confidence = self.settings.default_min_confidence;

        let candidates: Vec<HarvestCandidate> = self
            .source
            .fetch_candidates(date, None)
            .await?
            .into_iter()
            .filter(|c| crop_types.contains(&c.crop))
            .filter(|c| c.meets_confidence(min_confidence))
            .filter(|c| !planned.contains(&c.id))
            .collect();

        Ok(group_by_crop(date, candidates))
    }
}
