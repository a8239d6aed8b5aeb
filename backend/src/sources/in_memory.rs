use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{CropType, HarvestCandidate};

use super::{candidate_order, CandidateSource};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
struct SeededBatch {
    predicted_date: NaiveDate,
    candidate: HarvestCandidate,
    harvested: bool,
    disposed: bool,
}

/// In-memory candidate source.
///
/// Intended for tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryCandidateSource {
    batches: RwLock<Vec<SeededBatch>>,
}

impl InMemoryCandidateSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`InMemoryCandidateSource::insert`]
    pub fn with_candidate(self, predicted_date: NaiveDate, candidate: HarvestCandidate) -> Self {
        self.insert(predicted_date, candidate);
        self
    }

    /// Add a batch predicted to be ready on `predicted_date`
    pub fn insert(&self, predicted_date: NaiveDate, candidate: HarvestCandidate) {
        let mut batches = self.batches.write().unwrap_or_else(|e| e.into_inner());
        batches.push(SeededBatch {
            predicted_date,
            candidate,
            harvested: false,
            disposed: false,
        });
    }

    /// Mark every prediction of a batch as harvested
    pub fn mark_harvested(&self, batch_id: i64) {
        self.update(batch_id, |b| b.harvested = true);
    }

    /// Mark every prediction of a batch for disposal
    pub fn mark_disposed(&self, batch_id: i64) {
        self.update(batch_id, |b| b.disposed = true);
    }

    fn update(&self, batch_id: i64, apply: impl Fn(&mut SeededBatch)) {
        let mut batches = self.batches.write().unwrap_or_else(|e| e.into_inner());
        batches
            .iter_mut()
            .filter(|b| b.candidate.id == batch_id)
            .for_each(apply);
    }
}

#[async_trait]
impl CandidateSource for InMemoryCandidateSource {
    async fn fetch_candidates(
        &self,
        date: NaiveDate,
        crop_type: Option<&CropType>,
    ) -> AppResult<Vec<HarvestCandidate>> {
        let batches = self
            .batches
            .read()
            .map_err(|_| AppError::CollaboratorUnavailable("candidate source lock poisoned".into()))?;

        let mut candidates: Vec<HarvestCandidate> = batches
            .iter()
            .filter(|b| b.predicted_date == date && !b.harvested && !b.disposed)
            .filter(|b| crop_type.map_or(true, |crop| &b.candidate.crop == crop))
            .map(|b| b.candidate.clone())
            .collect();
        candidates.sort_by(candidate_order);

        Ok(candidates)
    }
}
