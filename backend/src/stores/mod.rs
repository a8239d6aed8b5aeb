//! Plan stores
//!
//! A plan store keeps the batches committed to the harvest plan of each date.
//! A batch appears at most once per date.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CommittedPlanEntry, NewPlanEntry};

use crate::error::AppResult;

mod in_memory;
mod postgres;

pub use in_memory::InMemoryPlanStore;
pub use postgres::PgPlanStore;

/// Persists committed harvest plan entries
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Commit a batch to the plan of `date` and return the new entry id
    ///
    /// Fails with `DuplicateEntry` when the batch is already planned for `date`.
    async fn add_entry(&self, date: NaiveDate, entry: &NewPlanEntry) -> AppResult<i64>;

    /// Entries planned for `date`, ordered by crop type then planned yield, highest first
    async fn list_entries(&self, date: NaiveDate) -> AppResult<Vec<CommittedPlanEntry>>;

    /// Remove a batch from the plan of `date`
    ///
    /// Fails with `NotFound` when the batch is not planned for `date`.
    async fn remove_entry(&self, date: NaiveDate, crop_cycle_id: i64) -> AppResult<()>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub(crate) fn entry_order(a: &CommittedPlanEntry, b: &CommittedPlanEntry) -> std::cmp::Ordering {
    a.crop_type
        .cmp(&b.crop_type)
        .then_with(|| b.planned_yield_g.total_cmp(&a.planned_yield_g))
        .then_with(|| a.id.cmp(&b.id))
}
