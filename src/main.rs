mod app;
mod auth;
mod config;
mod db;
mod error;
mod individuals;
mod seed;
mod state;
mod textgen;
mod users;

#[cfg(test)]
mod testing;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "uservault=debug,axum=info,tower_http=info".to_string());
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
    let (host, port) = (config.host.clone(), config.port);

    // Missing config, an unreachable database or a failed migration ends the process here.
    let (app_state, store) = AppState::init(config).await?;

    seed::run(app_state.users.as_ref(), &app_state.config.seed).await;

    let app = app::build_app(app_state);
    let served = app::serve(app, &host, port).await;

    store.close().await;
    tracing::info!("database pool closed");
    served
}
