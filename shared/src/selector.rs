//! Harvest selection
//!
//! Chooses which batches of one crop type to harvest on one date so that the
//! predicted yield covers a target. Two strategies are tried in order:
//!
//! 1. **Single batch**: if any sufficiently confident batch covers the target on
//!    its own, harvest only that batch (the most confident one, larger yield on
//!    ties).
//! 2. **Multi batch**: otherwise accumulate batches from most to least confident
//!    until the running total reaches the target. The batch that crosses the
//!    target is kept, so the total may overshoot by at most that batch's yield.
//!
//! The selector works purely on the candidates it is given and never fails.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::{CropType, HarvestCandidate, HarvestSelection, SelectionStrategy};

/// Select the batches to harvest for `crop_type` on `target_date`
///
/// `candidates` must already be the eligible set for that date and crop type.
/// Batches below `min_confidence` are ignored. An empty selection (with zero
/// total and zero confidence) is returned when nothing passes the filter.
pub fn select_harvest(
    candidates: &[HarvestCandidate],
    target_date: NaiveDate,
    crop_type: CropType,
    target_yield_g: f64,
    min_confidence: f64,
) -> HarvestSelection {
    let eligible: Vec<&HarvestCandidate> = candidates
        .iter()
        .filter(|c| c.meets_confidence(min_confidence))
        .collect();

    if eligible.is_empty() {
        return HarvestSelection::empty(target_date, crop_type, target_yield_g);
    }

    if let Some(best) = best_single_batch(&eligible, target_yield_g) {
        return HarvestSelection {
            target_date,
            crop_type,
            target_yield_g,
            total_predicted_yield_g: best.predicted_yield_g,
            confidence_score: best.confidence_score,
            selected_crops: vec![best.clone()],
            strategy: SelectionStrategy::SingleBatch,
        };
    }

    let selected = accumulate_by_confidence(eligible, target_yield_g);
    let total_predicted_yield_g: f64 = selected.iter().map(|c| c.predicted_yield_g).sum();
    let confidence_score = mean_confidence(&selected);

    HarvestSelection {
        target_date,
        crop_type,
        target_yield_g,
        selected_crops: selected.into_iter().cloned().collect(),
        total_predicted_yield_g,
        confidence_score,
        strategy: SelectionStrategy::MultiBatch,
    }
}

/// Most confident batch that covers the target alone, larger yield on ties
///
/// On an exact tie of both confidence and yield the earliest batch wins.
fn best_single_batch<'a>(
    eligible: &[&'a HarvestCandidate],
    target_yield_g: f64,
) -> Option<&'a HarvestCandidate> {
    eligible
        .iter()
        .copied()
        .filter(|c| c.predicted_yield_g >= target_yield_g)
        .fold(None, |best: Option<&HarvestCandidate>, candidate| match best {
            Some(current) if rank(candidate, current) != Ordering::Greater => Some(current),
            _ => Some(candidate),
        })
}

/// Lexicographic order on (confidence, yield)
fn rank(a: &HarvestCandidate, b: &HarvestCandidate) -> Ordering {
    a.confidence_score
        .total_cmp(&b.confidence_score)
        .then_with(|| a.predicted_yield_g.total_cmp(&b.predicted_yield_g))
}

/// Shortest confidence-ordered prefix whose yield reaches the target
///
/// Equal confidences keep their input order. If the whole set falls short,
/// every batch is returned.
fn accumulate_by_confidence(
    mut eligible: Vec<&HarvestCandidate>,
    target_yield_g: f64,
) -> Vec<&HarvestCandidate> {
    eligible.sort_by(|a, b| b.confidence_score.total_cmp(&a.confidence_score));

    let mut selected = Vec::new();
    let mut running_total = 0.0;
    for candidate in eligible {
        if running_total >= target_yield_g {
            break;
        }
        running_total += candidate.predicted_yield_g;
        selected.push(candidate);
    }
    selected
}

fn mean_confidence(selected: &[&HarvestCandidate]) -> f64 {
    if selected.is_empty() {
        return 0.0;
    }
    selected.iter().map(|c| c.confidence_score).sum::<f64>() / selected.len() as f64
}
