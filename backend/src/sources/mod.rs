//! Candidate sources
//!
//! A candidate source answers "which batches could be harvested on this date",
//! joining crop cycles with their ML yield predictions and greenhouse location.
//! Only batches that have not been harvested and are not marked for disposal
//! are returned. Confidence filtering is left to the selector.

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CropType, HarvestCandidate};

use crate::error::AppResult;

mod in_memory;
mod postgres;

pub use in_memory::InMemoryCandidateSource;
pub use postgres::PgCandidateSource;

/// Supplies harvest candidates per date and optional crop type
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Eligible batches predicted for `date`, optionally restricted to one crop type
    ///
    /// Ordered by crop, then confidence and yield, highest first.
    async fn fetch_candidates(
        &self,
        date: NaiveDate,
        crop_type: Option<&CropType>,
    ) -> AppResult<Vec<HarvestCandidate>>;

    /// Check that the backing storage is reachable
    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Ordering shared by every source implementation
pub(crate) fn candidate_order(a: &HarvestCandidate, b: &HarvestCandidate) -> std::cmp::Ordering {
    a.crop
        .cmp(&b.crop)
        .then_with(|| b.confidence_score.total_cmp(&a.confidence_score))
        .then_with(|| b.predicted_yield_g.total_cmp(&a.predicted_yield_g))
        .then_with(|| a.id.cmp(&b.id))
}
