use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    recipes::catalog::{Recipe, RecipeCategory},
    state::AppState,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

#[derive(Debug, Deserialize)]
pub struct RecipeQuery {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(q): Query<RecipeQuery>,
) -> AppResult<Json<Vec<Recipe>>> {
    let category = match q.category.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => Some(raw.parse::<RecipeCategory>().map_err(AppError::Validation)?),
    };
    let recipes = state
        .recipes
        .filter(category, q.search.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> AppResult<Json<Recipe>> {
    state
        .recipes
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Recipe not found".into()))
}
