use daily_diet_api::{
    app,
    config::AppConfig,
    db::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Test runs read their environment from .env.test, every other mode
    // from .env.
    match std::env::var("APP_ENV") {
        Ok(mode) if mode == "test" => {
            dotenvy::from_filename(".env.test").ok();
        }
        _ => {
            dotenvy::dotenv().ok();
        }
    }

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "daily_diet_api=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    tracing::info!(
        mode = %config.run_mode,
        engine = %config.database_type,
        "configuration loaded"
    );

    let state = AppState::init(config).await?;
    db::migrate(&state.db).await?;

    let port = state.config.port;
    let app = app::build_app(state);
    app::serve(app, port).await
}
