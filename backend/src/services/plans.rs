//! Committed harvest plans

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use shared::{validate_plan_entry, DailyPlan, HarvestSelection, NewPlanEntry, PlanSummary};

use crate::error::{AppError, AppResult};
use crate::stores::PlanStore;

/// Plan service over a plan store
#[derive(Clone)]
pub struct PlanService {
    store: Arc<dyn PlanStore>,
    daily_target_g: f64,
}

/// Result of committing a whole selection
#[derive(Debug, Clone, Default, Serialize)]
pub struct CommitOutcome {
    /// Ids of the new plan entries
    pub added: Vec<i64>,
    /// Crop cycles that were already planned for the date
    pub skipped: Vec<i64>,
}

impl PlanService {
    pub fn new(store: Arc<dyn PlanStore>, daily_target_g: f64) -> Self {
        Self {
            store,
            daily_target_g,
        }
    }

    /// Add a batch to the plan of `date`
    pub async fn add_to_plan(&self, date: NaiveDate, entry: NewPlanEntry) -> AppResult<i64> {
        validate_plan_entry(&entry).map_err(|e| AppError::validation(e.field, e.message))?;

        let id = self.store.add_entry(date, &entry).await?;
        tracing::info!(
            %date,
            id,
            crop_cycle_id = entry.crop_cycle_id,
            crop_type = %entry.crop_type,
            planned_yield_g = entry.planned_yield_g,
            "Added crop to harvest plan"
        );
        Ok(id)
    }

    /// Entries and summary of the plan of `date`
    pub async fn get_plan(&self, date: NaiveDate) -> AppResult<DailyPlan> {
        let items = self.store.list_entries(date).await?;
        let summary = PlanSummary::from_entries(&items, self.daily_target_g);
        Ok(DailyPlan {
            date,
            items,
            summary,
        })
    }

    pub async fn remove_from_plan(&self, date: NaiveDate, crop_cycle_id: i64) -> AppResult<()> {
        self.store.remove_entry(date, crop_cycle_id).await?;
        tracing::info!(%date, crop_cycle_id, "Removed crop from harvest plan");
        Ok(())
    }

    /// Commit every batch of a selection to the plan of its target date
    ///
    /// Batches already in the plan are reported as skipped rather than failing the commit.
    /// Any other failure removes the entries this commit already added.
    pub async fn commit_selection(&self, selection: &HarvestSelection) -> AppResult<CommitOutcome> {
        let date = selection.target_date;
        let mut outcome = CommitOutcome::default();
        let mut committed = Vec::new();
        for candidate in &selection.selected_crops {
            match self.add_to_plan(date, NewPlanEntry::from(candidate)).await {
                Ok(id) => {
                    outcome.added.push(id);
                    committed.push(candidate.id);
                }
                Err(AppError::DuplicateEntry(_)) => outcome.skipped.push(candidate.id),
                Err(e) => {
                    self.roll_back(date, &committed).await;
                    return Err(e);
                }
            }
        }
        Ok(outcome)
    }

    async fn roll_back(&self, date: NaiveDate, crop_cycle_ids: &[i64]) {
        for &crop_cycle_id in crop_cycle_ids {
            if let Err(e) = self.store.remove_entry(date, crop_cycle_id).await {
                tracing::warn!(%date, crop_cycle_id, error = %e, "Failed to roll back plan entry");
            }
        }
        if !crop_cycle_ids.is_empty() {
            tracing::info!(%date, count = crop_cycle_ids.len(), "Rolled back partial commit");
        }
    }
}
