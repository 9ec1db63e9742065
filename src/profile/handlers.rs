use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::AuthUser,
    error::{AppError, AppResult},
    profile::{
        dto::{ProfileResponse, SuggestedGoalQuery, SuggestedGoalResponse, UpdateProfileRequest},
        repo_types::Profile,
        services::{suggest_from_query, validate_update},
    },
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/user/profile", get(get_profile).put(update_profile))
        .route("/user/suggested-goal", get(get_suggested_goal))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let profile = state.profiles.get(user_id).await?;
    Ok(Json(ProfileResponse {
        user: user.into(),
        profile,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    let update = validate_update(payload)?;
    let profile = state.profiles.upsert(user_id, update).await?;
    info!(%user_id, goal = profile.daily_calorie_goal, "profile updated");
    Ok(Json(profile))
}

#[instrument(skip(_user))]
pub async fn get_suggested_goal(
    _user: AuthUser,
    Query(q): Query<SuggestedGoalQuery>,
) -> Json<SuggestedGoalResponse> {
    Json(SuggestedGoalResponse {
        suggested_goal: suggest_from_query(&q),
    })
}
