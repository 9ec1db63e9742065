//! Suggested daily calorie goal from body metrics.
//!
//! Uses the Mifflin-St Jeor resting energy equation with a sedentary activity
//! multiplier. The suggestion only prefills onboarding; users may override it.

use serde::{Deserialize, Serialize};

/// Goal applied whenever a user has no usable goal of their own.
pub const DEFAULT_DAILY_GOAL: u32 = 2000;

/// Bounds accepted for a user-chosen daily goal.
pub const MIN_DAILY_GOAL: u32 = 800;
pub const MAX_DAILY_GOAL: u32 = 5000;

const SEDENTARY_MULTIPLIER: f64 = 1.2;

const MALE_OFFSET: f64 = 5.0;
const FEMALE_OFFSET: f64 = -161.0;
/// Midpoint of the male and female offsets.
const NEUTRAL_OFFSET: f64 = -78.0;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Gender {
    Male,
    Female,
    Other,
    #[default]
    #[serde(alias = "unspecified")]
    PreferNotToSay,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
            Gender::PreferNotToSay => "prefer-not-to-say",
        }
    }

    fn bmr_offset(self) -> f64 {
        match self {
            Gender::Male => MALE_OFFSET,
            Gender::Female => FEMALE_OFFSET,
            Gender::Other | Gender::PreferNotToSay => NEUTRAL_OFFSET,
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            "prefer-not-to-say" | "unspecified" => Ok(Gender::PreferNotToSay),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// Basal metabolic rate in kcal/day, or `None` when a metric is missing,
/// zero, negative or not a number.
pub fn bmr(age: Option<u32>, weight_kg: Option<f64>, height_cm: Option<f64>, gender: Gender) -> Option<f64> {
    let age = f64::from(age.filter(|a| *a > 0)?);
    let weight = usable(weight_kg)?;
    let height = usable(height_cm)?;
    Some(10.0 * weight + 6.25 * height - 5.0 * age + gender.bmr_offset())
}

/// Suggested daily goal: `round(bmr * 1.2)`, halves rounding up.
pub fn suggested_goal(
    age: Option<u32>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    gender: Gender,
) -> Option<u32> {
    let tdee = (bmr(age, weight_kg, height_cm, gender)? * SEDENTARY_MULTIPLIER).round();
    if tdee >= 1.0 && tdee <= f64::from(u32::MAX) {
        Some(tdee as u32)
    } else {
        None
    }
}

/// Explicit goal, else the suggestion, else [`DEFAULT_DAILY_GOAL`].
pub fn goal_or_default(explicit: Option<u32>, suggested: Option<u32>) -> u32 {
    explicit
        .filter(|g| *g > 0)
        .or(suggested.filter(|g| *g > 0))
        .unwrap_or(DEFAULT_DAILY_GOAL)
}

pub fn goal_in_range(goal: u32) -> bool {
    (MIN_DAILY_GOAL..=MAX_DAILY_GOAL).contains(&goal)
}

/// Pulls a computed goal into the accepted 800..=5000 band.
pub fn clamp_goal(goal: u32) -> u32 {
    goal.clamp(MIN_DAILY_GOAL, MAX_DAILY_GOAL)
}
