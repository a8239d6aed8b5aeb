//! Common types used across the platform

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Grams to kilograms, rounded to 2 decimal places
pub fn grams_to_kg(grams: f64) -> f64 {
    round_to(grams / 1000.0, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grams_to_kg() {
        assert_eq!(grams_to_kg(4500.0), 4.5);
        assert_eq!(grams_to_kg(1234.0), 1.23);
        assert_eq!(grams_to_kg(0.0), 0.0);
    }
}
