//! Harvest calendar and availability aggregation

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::models::{
    AvailabilityTotals, AvailableCrops, CropAvailabilitySummary, CropType, HarvestCandidate,
};
use crate::types::{grams_to_kg, DateRange};

/// Length of the planning window that starts at the requested week start
pub const PLANNING_WINDOW_DAYS: u64 = 5;

/// Whether harvests are scheduled on this date (Monday to Friday)
pub fn is_harvest_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The 5-day window starting at `week_start`
pub fn planning_window(week_start: NaiveDate) -> DateRange {
    let end = week_start
        .checked_add_days(Days::new(PLANNING_WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MAX);
    DateRange::new(week_start, end)
}

/// Weekdays inside the 5-day window starting at `week_start`
///
/// Weekend days in the window are dropped, so a window that starts on a
/// Saturday only yields Monday to Wednesday.
pub fn harvest_days(week_start: NaiveDate) -> Vec<NaiveDate> {
    week_start
        .iter_days()
        .take(PLANNING_WINDOW_DAYS as usize)
        .filter(|date| is_harvest_day(*date))
        .collect()
}

/// Count, mean yield, mean confidence and max yield of a crop's candidates
///
/// Returns `None` when there are no candidates.
pub fn summarize_crop(
    crop: &CropType,
    candidates: &[HarvestCandidate],
) -> Option<CropAvailabilitySummary> {
    if candidates.is_empty() {
        return None;
    }

    let count = candidates.len() as f64;
    let total_yield: f64 = candidates.iter().map(|c| c.predicted_yield_g).sum();
    let total_confidence: f64 = candidates.iter().map(|c| c.confidence_score).sum();
    let max_yield_g = candidates
        .iter()
        .map(|c| c.predicted_yield_g)
        .fold(f64::NEG_INFINITY, f64::max);

    Some(CropAvailabilitySummary {
        crop: crop.clone(),
        available_crops: candidates.len(),
        avg_yield_g: total_yield / count,
        avg_confidence: total_confidence / count,
        max_yield_g,
    })
}

/// Group candidates by crop type, most confident (then largest) first
pub fn group_by_crop(date: NaiveDate, candidates: Vec<HarvestCandidate>) -> AvailableCrops {
    let total_available_crops = candidates.len();
    let total_predicted_yield_g: f64 = candidates.iter().map(|c| c.predicted_yield_g).sum();

    let mut crops: BTreeMap<CropType, Vec<HarvestCandidate>> = BTreeMap::new();
    for candidate in candidates {
        crops.entry(candidate.crop.clone()).or_default().push(candidate);
    }
    for list in crops.values_mut() {
        list.sort_by(|a, b| {
            b.confidence_score
                .total_cmp(&a.confidence_score)
                .then_with(|| b.predicted_yield_g.total_cmp(&a.predicted_yield_g))
        });
    }

    AvailableCrops {
        date,
        crops,
        summary: AvailabilityTotals {
            total_available_crops,
            total_predicted_yield_g,
            total_predicted_yield_kg: grams_to_kg(total_predicted_yield_g),
        },
    }
}
