mod app;
mod auth;
mod config;
mod dates;
mod db;
mod entries;
mod error;
mod estimator;
mod images;
mod insights;
mod profile;
mod recipes;
mod state;
mod storage;
#[cfg(test)]
mod test_utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "calorie_tracker=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    tracing::info!(
        utc_offset_minutes = state.config.utc_offset_minutes,
        estimator = state.estimator.enabled(),
        "state initialised"
    );

    app::serve(app::build_app(state)).await
}
