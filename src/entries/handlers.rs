use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    dates,
    entries::{
        dto::{CreateEntryRequest, DailySummary, RangeQuery, WeeklyPoint},
        repo_types::FoodEntry,
        services,
    },
    error::{AppError, AppResult},
    images::services::UploadItem,
    insights::badge::BadgeResult,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/calories", get(list_entries))
        .route("/calories/daily/:date", get(get_daily))
        .route("/calories/weekly", get(get_weekly))
        .route("/calories/badge", get(get_badge))
        .route("/calories/:id/image", get(get_entry_image)) // 302 to a presigned url
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/calories", post(create_entry))
        .route("/calories/:id", delete(delete_entry))
        .route(
            "/calories/from-image",
            post(create_entry_from_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
}

#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RangeQuery>,
) -> AppResult<Json<Vec<FoodEntry>>> {
    let today = dates::today(state.config.utc_offset());
    Ok(Json(services::list_entries(&state, user_id, &q, today).await?))
}

#[instrument(skip(state))]
pub async fn get_daily(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(raw): Path<String>,
) -> AppResult<Json<DailySummary>> {
    let date = dates::parse_day(&raw, state.config.utc_offset())?;
    Ok(Json(services::daily_summary(&state, user_id, date).await?))
}

#[instrument(skip(state))]
pub async fn get_weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<WeeklyPoint>>> {
    let today = dates::today(state.config.utc_offset());
    Ok(Json(services::weekly_summary(&state, user_id, today).await?))
}

#[instrument(skip(state))]
pub async fn get_badge(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Json<BadgeResult> {
    let today = dates::today(state.config.utc_offset());
    Json(services::monthly_badge_for(&state, user_id, today).await)
}

#[instrument(skip(state, payload))]
pub async fn create_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateEntryRequest>,
) -> AppResult<(StatusCode, Json<FoodEntry>)> {
    let entry =
        services::create_entry(&state, user_id, payload, None, OffsetDateTime::now_utc()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

fn optional_text(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// POST /calories/from-image (multipart)
/// Fields: `image` (file), optional `foodName`, `calories`, `mealType`, `date`.
#[instrument(skip(state, mp))]
pub async fn create_entry_from_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<FoodEntry>)> {
    let mut req = CreateEntryRequest::default();
    let mut image = None;

    let bad_form = |e: axum::extract::multipart::MultipartError| {
        warn!(error = %e, "unreadable multipart body");
        AppError::Validation(format!("Invalid upload: {e}"))
    };

    while let Some(field) = mp.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field.bytes().await.map_err(bad_form)?;
                if !body.is_empty() {
                    image = Some(UploadItem { body, content_type });
                }
            }
            "foodName" => req.food_name = optional_text(field.text().await.map_err(bad_form)?),
            "mealType" => req.meal_type = optional_text(field.text().await.map_err(bad_form)?),
            "date" => req.date = optional_text(field.text().await.map_err(bad_form)?),
            "calories" => {
                req.calories = optional_text(field.text().await.map_err(bad_form)?)
                    .map(|raw| {
                        raw.parse::<f64>().map_err(|_| {
                            AppError::Validation("Calories must be a non-negative number".into())
                        })
                    })
                    .transpose()?;
            }
            _ => {}
        }
    }

    if image.is_none() && req.food_name.is_none() {
        return Err(AppError::Validation(
            "Please upload an image or enter a food name".into(),
        ));
    }

    let entry =
        services::create_entry(&state, user_id, req, image, OffsetDateTime::now_utc()).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_entry(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_entry_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let url = services::entry_image_url(&state, user_id, id).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}
