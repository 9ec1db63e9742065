use time::{format_description::well_known::Rfc3339, Date, OffsetDateTime, UtcOffset};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dates,
    entries::{
        dto::{CreateEntryRequest, DailySummary, RangeQuery, WeeklyPoint},
        repo_types::{FoodEntry, MealType, NewFoodEntry},
    },
    error::{AppError, AppResult},
    estimator::{Estimate, EstimateRequest},
    images::services::{
        discard_image, ext_from_mime, presign_entry_image, upload_entry_image, UploadItem,
    },
    insights::{
        aggregate::{daily_totals, grand_total, pad_days, totals_by_day},
        badge::{monthly_badge, BadgeResult},
        status::{chart_color, classify},
    },
    profile::services::effective_goal,
    state::AppState,
};

/// Name given to an image entry when neither the user nor the estimator
/// supplied one.
pub const DETECTED_FOOD_NAME: &str = "Detected Food";

pub const WEEK_DAYS: u16 = 7;

/// Days listed by the range endpoint when `startDate` is omitted.
pub const DEFAULT_RANGE_DAYS: u16 = 30;

/// Largest value the `calories INTEGER` column holds.
pub const MAX_ENTRY_CALORIES: u32 = i32::MAX as u32;

fn parse_calories(raw: Option<f64>) -> AppResult<Option<u32>> {
    match raw {
        None => Ok(None),
        Some(c) if c.is_finite() && c >= 0.0 && c.round() <= f64::from(MAX_ENTRY_CALORIES) => {
            Ok(Some(c.round() as u32))
        }
        Some(c) if c.is_finite() && c > 0.0 => Err(AppError::Validation(format!(
            "Calories must be at most {MAX_ENTRY_CALORIES}"
        ))),
        Some(_) => Err(AppError::Validation(
            "Calories must be a non-negative number".into(),
        )),
    }
}

fn parse_meal_type(raw: Option<&str>) -> AppResult<MealType> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(MealType::default()),
        Some(s) => s.parse().map_err(AppError::Validation),
    }
}

/// Timestamp of a new entry. A bare `YYYY-MM-DD` keeps the current time of
/// day so the entry lands on that calendar day.
pub fn parse_logged_at(
    raw: Option<&str>,
    offset: UtcOffset,
    now: OffsetDateTime,
) -> AppResult<OffsetDateTime> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(now);
    };
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts);
    }
    dates::parse_iso_day(raw)
        .map(|day| day.with_time(now.to_offset(offset).time()).assume_offset(offset))
        .map_err(|_| AppError::Validation(format!("invalid date: {raw}")))
}

async fn estimate(
    state: &AppState,
    food_name: Option<String>,
    image: Option<UploadItem>,
) -> AppResult<Estimate> {
    if !state.estimator.enabled() {
        return Err(AppError::Unprocessable(
            "Calories are required: automatic estimation is not available".into(),
        ));
    }
    state
        .estimator
        .estimate(EstimateRequest { food_name, image })
        .await
        .map_err(AppError::Upstream)
}

/// Creates an entry from a manual form (`image == None`, food name required)
/// or from an uploaded photo (name optional). Calories left out are
/// estimated. The image is stored before the row; if the insert fails the
/// stored image is removed again.
pub async fn create_entry(
    state: &AppState,
    user_id: Uuid,
    req: CreateEntryRequest,
    image: Option<UploadItem>,
    now: OffsetDateTime,
) -> AppResult<FoodEntry> {
    let food_name = req
        .food_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);

    match &image {
        None if food_name.is_none() => {
            return Err(AppError::Validation("Food name is required".into()));
        }
        Some(img) if ext_from_mime(&img.content_type).is_none() => {
            return Err(AppError::Validation(format!(
                "Unsupported image type: {}",
                img.content_type
            )));
        }
        _ => {}
    }

    let meal_type = parse_meal_type(req.meal_type.as_deref())?;
    let logged_at = parse_logged_at(req.date.as_deref(), state.config.utc_offset(), now)?;

    let (food_name, calories) = match parse_calories(req.calories)? {
        Some(calories) => (food_name, calories),
        None => {
            let est = estimate(state, food_name.clone(), image.clone()).await?;
            (food_name.or(est.food_name), est.calories.min(MAX_ENTRY_CALORIES))
        }
    };

    let id = Uuid::new_v4();
    let image_key = match &image {
        Some(img) => Some(
            upload_entry_image(state, user_id, id, img)
                .await
                .map_err(AppError::Upstream)?,
        ),
        None => None,
    };

    let new = NewFoodEntry {
        id,
        food_name: food_name.unwrap_or_else(|| DETECTED_FOOD_NAME.to_string()),
        calories,
        meal_type,
        logged_at,
        image_key,
    };
    let image_key = new.image_key.clone();

    match state.entries.insert(user_id, new).await {
        Ok(entry) => {
            info!(%user_id, entry_id = %entry.id, calories = entry.calories, has_image = entry.has_image(), "entry created");
            Ok(entry)
        }
        Err(e) => {
            if let Some(key) = image_key {
                discard_image(state, &key).await;
            }
            Err(e.into())
        }
    }
}

/// Entries whose calendar day lies in `[start, end]`, oldest first.
pub async fn entries_between(
    state: &AppState,
    user_id: Uuid,
    start: Date,
    end: Date,
) -> AppResult<Vec<FoodEntry>> {
    if start > end {
        return Err(AppError::Validation(
            "startDate must not be after endDate".into(),
        ));
    }
    let (from, to) = dates::day_range_bounds(start, end, state.config.utc_offset());
    Ok(state.entries.list_between(user_id, from, to).await?)
}

pub async fn list_entries(
    state: &AppState,
    user_id: Uuid,
    q: &RangeQuery,
    today: Date,
) -> AppResult<Vec<FoodEntry>> {
    let offset = state.config.utc_offset();
    let end = q
        .end_date
        .as_deref()
        .map(|d| dates::parse_day(d, offset))
        .transpose()?
        .unwrap_or(today);
    let start = q
        .start_date
        .as_deref()
        .map(|d| dates::parse_day(d, offset))
        .transpose()?
        .unwrap_or_else(|| dates::window_start(end, DEFAULT_RANGE_DAYS));
    entries_between(state, user_id, start, end).await
}

pub async fn daily_summary(state: &AppState, user_id: Uuid, date: Date) -> AppResult<DailySummary> {
    let entries = entries_between(state, user_id, date, date).await?;
    let total_calories = grand_total(&daily_totals(
        &entries,
        date,
        date,
        state.config.utc_offset(),
    ));
    let goal = effective_goal(state, user_id).await?;
    Ok(DailySummary {
        date,
        entries,
        total_calories,
        goal,
        status: classify(total_calories, goal),
    })
}

/// Seven points, `today` and the six days before it, ascending.
pub async fn weekly_summary(
    state: &AppState,
    user_id: Uuid,
    today: Date,
) -> AppResult<Vec<WeeklyPoint>> {
    let start = dates::window_start(today, WEEK_DAYS);
    let entries = entries_between(state, user_id, start, today).await?;
    let goal = effective_goal(state, user_id).await?;

    let observed = daily_totals(&entries, start, today, state.config.utc_offset());
    Ok(pad_days(&observed, start, today)
        .into_iter()
        .map(|t| WeeklyPoint {
            date: t.date,
            calories: t.calories,
            status: classify(t.calories, goal).category,
            color: chart_color(t.calories, goal),
        })
        .collect())
}

/// Badge for the month containing `today`. Any failure to load data yields
/// the not-eligible result instead of an error.
pub async fn monthly_badge_for(state: &AppState, user_id: Uuid, today: Date) -> BadgeResult {
    let offset = state.config.utc_offset();
    let result: anyhow::Result<BadgeResult> = async {
        let (from, to) = dates::day_range_bounds(dates::month_start(today), today, offset);
        let entries = state.entries.list_between(user_id, from, to).await?;
        let goal = effective_goal(state, user_id).await?;
        Ok(monthly_badge(&totals_by_day(&entries, offset), goal))
    }
    .await;

    result.unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), %user_id, "badge evaluation failed");
        BadgeResult::not_eligible()
    })
}

pub async fn delete_entry(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let entry = state
        .entries
        .delete(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;
    if let Some(key) = &entry.image_key {
        discard_image(state, key).await;
    }
    info!(%user_id, entry_id = %id, "entry deleted");
    Ok(())
}

pub async fn entry_image_url(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<String> {
    let entry = state
        .entries
        .find(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;
    let key = entry
        .image_key
        .ok_or_else(|| AppError::NotFound("Entry has no image".into()))?;
    presign_entry_image(state, &key)
        .await
        .map_err(AppError::Upstream)
}
