//! Heuristic availability scoring.
//!
//! Deterministic and explainable, not a trained model. Two variants:
//! a per-lot score derived from the accessible-space ratio, and a
//! time/location score used by the predict endpoint. Both clamp into fixed
//! bands and the second one keeps an ordered reason log so every applied
//! rule is visible in the response.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;

use crate::geo::haversine_m;

/// Downtown Kingston anchor used by the time/location heuristic.
pub const DOWNTOWN_KINGSTON: (f64, f64) = (44.2312, -76.4860);

/// Prior used when a lot's accessible-space count or capacity is unknown.
const UNKNOWN_PRIOR: f64 = 0.35;

/// Probability of finding an accessible space in a lot.
///
/// Unknown counts, unknown capacity, or non-positive capacity all map to
/// the fixed 0.35 prior. Otherwise the score grows linearly with the
/// accessible-space ratio and clamps to [0.15, 0.95].
#[must_use]
pub fn lot_probability(accessible_spaces: Option<i64>, capacity: Option<i64>) -> f64 {
    match (accessible_spaces, capacity) {
        (Some(spaces), Some(capacity)) if capacity > 0 => {
            #[allow(clippy::cast_precision_loss)]
            let ratio = spaces as f64 / capacity as f64;
            (0.25 + ratio * 1.5).clamp(0.15, 0.95)
        }
        _ => UNKNOWN_PRIOR,
    }
}

/// Result of the time/location availability heuristic.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub probability: f64,
    pub tier: String,
    /// Ordered log of applied rules, e.g.
    /// `"base=0.70;downtown(-0.20);morning_commute(-0.08)"`.
    pub reason: String,
}

/// Predict the probability of finding an accessible spot near a point at a
/// given local wall-clock time.
///
/// Starts from a 0.70 base and applies ordered additive penalties; each
/// triggered rule appends its token and signed delta to the reason log.
/// The final probability clamps to [0.05, 0.95].
#[must_use]
pub fn predict_availability(lat: f64, lon: f64, when: NaiveDateTime) -> Prediction {
    let mut p: f64 = 0.70;
    let mut reasons: Vec<&'static str> = vec!["base=0.70"];

    let downtown_km =
        haversine_m(lat, lon, DOWNTOWN_KINGSTON.0, DOWNTOWN_KINGSTON.1) / 1_000.0;
    if downtown_km <= 1.5 {
        p -= 0.20;
        reasons.push("downtown(-0.20)");
    } else if downtown_km <= 3.0 {
        p -= 0.10;
        reasons.push("near_downtown(-0.10)");
    }

    let hour = when.hour();
    let is_weekend = matches!(when.weekday(), Weekday::Sat | Weekday::Sun);

    if (7..=9).contains(&hour) {
        p -= 0.08;
        reasons.push("morning_commute(-0.08)");
    }
    if (11..=14).contains(&hour) {
        p -= 0.10;
        reasons.push("midday(-0.10)");
    }
    if (16..=18).contains(&hour) {
        p -= 0.12;
        reasons.push("evening_peak(-0.12)");
    }
    if is_weekend && (10..=13).contains(&hour) {
        p -= 0.10;
        reasons.push("weekend_morning(-0.10)");
    }

    let probability = p.clamp(0.05, 0.95);
    Prediction {
        probability,
        tier: tier_for(probability).to_owned(),
        reason: reasons.join(";"),
    }
}

/// Coarse probability bucket.
#[must_use]
pub fn tier_for(probability: f64) -> &'static str {
    if probability >= 0.70 {
        "high"
    } else if probability >= 0.45 {
        "medium"
    } else {
        "low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .expect("valid date")
            .and_hms_opt(hour, 0, 0)
            .expect("valid time")
    }

    #[test]
    fn three_of_ten_accessible_spaces_scores_seventy_percent() {
        let p = lot_probability(Some(3), Some(10));
        assert!((p - 0.70).abs() < 1e-9, "got {p}");
    }

    #[test]
    fn unknown_counts_use_the_fixed_prior() {
        assert!((lot_probability(None, Some(10)) - 0.35).abs() < 1e-9);
        assert!((lot_probability(Some(3), None) - 0.35).abs() < 1e-9);
        assert!((lot_probability(Some(3), Some(0)) - 0.35).abs() < 1e-9);
        assert!((lot_probability(Some(3), Some(-2)) - 0.35).abs() < 1e-9);
    }

    #[test]
    fn lot_probability_is_clamped_and_monotonic() {
        assert!((lot_probability(Some(0), Some(100)) - 0.25).abs() < 1e-9);
        assert!((lot_probability(Some(100), Some(100)) - 0.95).abs() < 1e-9);

        let mut last = 0.0;
        for spaces in 0..=50 {
            let p = lot_probability(Some(spaces), Some(50));
            assert!((0.15..=0.95).contains(&p));
            assert!(p >= last, "not monotonic at {spaces}: {p} < {last}");
            last = p;
        }
    }

    #[test]
    fn downtown_tuesday_morning_worked_example() {
        // 2026-08-25 is a Tuesday.
        let prediction =
            predict_availability(DOWNTOWN_KINGSTON.0, DOWNTOWN_KINGSTON.1, at(2026, 8, 25, 8));
        assert!((prediction.probability - 0.42).abs() < 1e-9, "{prediction:?}");
        assert_eq!(prediction.tier, "low");
        assert_eq!(
            prediction.reason,
            "base=0.70;downtown(-0.20);morning_commute(-0.08)"
        );
    }

    #[test]
    fn far_from_downtown_off_peak_keeps_the_base() {
        let prediction = predict_availability(44.35, -76.25, at(2026, 8, 25, 3));
        assert!((prediction.probability - 0.70).abs() < 1e-9);
        assert_eq!(prediction.tier, "high");
        assert_eq!(prediction.reason, "base=0.70");
    }

    #[test]
    fn near_downtown_band_applies_between_1_5_and_3_km() {
        // ~2.2 km north of the anchor.
        let prediction = predict_availability(44.2512, -76.4860, at(2026, 8, 25, 3));
        assert_eq!(prediction.reason, "base=0.70;near_downtown(-0.10)");
    }

    #[test]
    fn weekend_midday_stacks_ordered_penalties() {
        // 2026-08-29 is a Saturday, 12:00 triggers midday and weekend_morning.
        let prediction =
            predict_availability(DOWNTOWN_KINGSTON.0, DOWNTOWN_KINGSTON.1, at(2026, 8, 29, 12));
        assert_eq!(
            prediction.reason,
            "base=0.70;downtown(-0.20);midday(-0.10);weekend_morning(-0.10)"
        );
        assert!((prediction.probability - 0.30).abs() < 1e-9);
        assert_eq!(prediction.tier, "low");
    }

    #[test]
    fn tier_boundaries_are_inclusive() {
        assert_eq!(tier_for(0.70), "high");
        assert_eq!(tier_for(0.69), "medium");
        assert_eq!(tier_for(0.45), "medium");
        assert_eq!(tier_for(0.44), "low");
    }
}
