use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    entries::repo_types::FoodEntry,
    insights::status::{StatusCategory, StatusResult},
};

/// Fields shared by manual and image-based entry creation. Everything but
/// the food name is optional; missing calories are estimated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    #[serde(default)]
    pub food_name: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub meal_type: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp; now when absent.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub entries: Vec<FoodEntry>,
    pub total_calories: u32,
    pub goal: u32,
    pub status: StatusResult,
}

/// One bar of the weekly chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyPoint {
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub calories: u32,
    pub status: StatusCategory,
    pub color: &'static str,
}
