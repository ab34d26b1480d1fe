//! Scheduler HTTP server entry point.

use anyhow::Context;
use log::info;
use scheduler_core::db::open_db;
use scheduler_core::init_logging;
use scheduler_server::build_router;
use scheduler_server::config::{load_dotenv, ServerConfig};
use scheduler_server::state::{AppState, Clock};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = ServerConfig::from_env()?;

    let log_dir = config
        .log_dir
        .to_str()
        .context("log directory must be valid UTF-8")?;
    init_logging(&config.log_level, log_dir).map_err(anyhow::Error::msg)?;

    let conn = open_db(&config.db_file)
        .with_context(|| format!("failed to open database `{}`", config.db_file.display()))?;
    let state = Arc::new(AppState::new(conn, Clock::System));
    let app = build_router(state, &config.web_dir);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(
        "event=server_start module=server status=ok addr={} db_file={} web_dir={}",
        addr,
        config.db_file.display(),
        config.web_dir.display()
    );

    axum::serve(listener, app).await?;
    Ok(())
}
