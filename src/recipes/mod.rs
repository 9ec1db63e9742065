use crate::state::AppState;
use axum::Router;

pub mod catalog;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::recipe_routes()
}
