use std::sync::Arc;

use jobboard::{accounts::postgres::PgStore, app, config::AppConfig, db, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "jobboard=debug,axum=info,tower_http=info".to_string());
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

    let db = db::connect(&config).await?;
    db::migrate(&db).await?;

    let state = AppState::with_store(Arc::new(config), PgStore::new(db))?;
    let addr = state.config.bind_addr();
    app::serve(app::build_app(state), &addr).await
}
