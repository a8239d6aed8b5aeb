use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CommittedPlanEntry, NewPlanEntry};

use super::{entry_order, PlanStore};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
struct Plans {
    next_id: i64,
    // (date, crop_cycle_id) -> entry
    entries: BTreeMap<(NaiveDate, i64), CommittedPlanEntry>,
}

/// In-memory plan store for tests and local runs
#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    inner: RwLock<Plans>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> AppError {
    AppError::CollaboratorUnavailable("plan store lock poisoned".into())
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn add_entry(&self, date: NaiveDate, entry: &NewPlanEntry) -> AppResult<i64> {
        let mut plans = self.inner.write().map_err(|_| poisoned())?;

        let key = (date, entry.crop_cycle_id);
        if plans.entries.contains_key(&key) {
            tracing::warn!(%date, crop_cycle_id = entry.crop_cycle_id, "Rejected duplicate plan entry");
            return Err(AppError::DuplicateEntry(format!(
                "Crop cycle {} in plan for {}",
                entry.crop_cycle_id, date
            )));
        }

        plans.next_id += 1;
        let id = plans.next_id;
        plans
            .entries
            .insert(key, entry.clone().into_committed(id, date));
        Ok(id)
    }

    async fn list_entries(&self, date: NaiveDate) -> AppResult<Vec<CommittedPlanEntry>> {
        let plans = self.inner.read().map_err(|_| poisoned())?;

        let mut entries: Vec<CommittedPlanEntry> = plans
            .entries
            .range((date, i64::MIN)..=(date, i64::MAX))
            .map(|(_, e)| e.clone())
            .collect();
        entries.sort_by(entry_order);
        Ok(entries)
    }

    async fn remove_entry(&self, date: NaiveDate, crop_cycle_id: i64) -> AppResult<()> {
        let mut plans = self.inner.write().map_err(|_| poisoned())?;

        plans
            .entries
            .remove(&(date, crop_cycle_id))
            .map(|_| ())
            .ok_or_else(|| {
                AppError::NotFound(format!("Crop cycle {} in plan for {}", crop_cycle_id, date))
            })
    }
}
