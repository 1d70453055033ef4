//! Keisan · arithmetic practice backend
//!
//! - Axum HTTP + WebSocket API over the procedural question generator
//! - In-memory quiz sessions scored with the answer normalizer
//!
//! Important env variables:
//!   PORT                : u16 (default 3000)
//!   KEISAN_CONFIG_PATH  : path to TOML config (quiz policy, generator cap, extra topics)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use keisan::routes::build_router;
use keisan::state::AppState;
use keisan::telemetry;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let state = Arc::new(AppState::from_env());
  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "keisan_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "keisan_backend", "Server stopped");
  Ok(())
}

async fn shutdown_signal() {
  match tokio::signal::ctrl_c().await {
    Ok(()) => info!(target: "keisan_backend", "Shutdown signal received"),
    Err(e) => tracing::error!(target: "keisan_backend", error = %e, "Failed to listen for shutdown signal"),
  }
}
