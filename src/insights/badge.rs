//! Monthly "You're Healthy!" achievement.
//!
//! A day counts toward the badge when its total lies within a flat band around
//! the goal. The band is wider on the high side than the daily status's
//! "within" category and must stay separate from it.

use std::collections::BTreeMap;

use serde::Serialize;
use time::Date;

pub const BADGE_LOWER_RATIO: f64 = 0.8;
pub const BADGE_UPPER_RATIO: f64 = 1.2;
/// Share of logged days that must be within the band.
pub const BADGE_COVERAGE: f64 = 0.7;
/// Logged days required before the badge can be earned at all.
pub const BADGE_MIN_LOGGED_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResult {
    pub eligible: bool,
    pub days_with_entries: usize,
    pub days_within_limit: usize,
    pub threshold: usize,
}

impl BadgeResult {
    /// Result reported when the month's data could not be loaded.
    pub fn not_eligible() -> Self {
        Self {
            eligible: false,
            days_with_entries: 0,
            days_within_limit: 0,
            threshold: 1,
        }
    }
}

pub fn within_badge_band(total: u32, goal: u32) -> bool {
    let total = f64::from(total);
    let goal = f64::from(goal);
    total >= goal * BADGE_LOWER_RATIO && total <= goal * BADGE_UPPER_RATIO
}

/// Evaluates month-to-date totals (unpadded: only days with entries).
pub fn monthly_badge(totals: &BTreeMap<Date, u32>, goal: u32) -> BadgeResult {
    let days_with_entries = totals.len();
    let days_within_limit = totals
        .values()
        .filter(|total| within_badge_band(**total, goal))
        .count();
    let threshold = ((days_with_entries as f64 * BADGE_COVERAGE).floor() as usize).max(1);

    BadgeResult {
        eligible: days_within_limit >= threshold && days_with_entries >= BADGE_MIN_LOGGED_DAYS,
        days_with_entries,
        days_within_limit,
        threshold,
    }
}
