//! Local REST API for controlling the recording session.
//!
//! Endpoints:
//! - Session lifecycle (POST /start, /pause, /resume, /stop)
//! - Transforms (POST /transform)
//! - State inspection (GET /status)

pub mod error;
pub mod routes;

use crate::config::Config;
use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tracing::info;

pub use routes::session::{SessionApiState, SessionCommand};

pub struct ApiServer {
    port: u16,
    session_state: SessionApiState,
}

impl ApiServer {
    pub fn new(
        tx: tokio::sync::mpsc::Sender<SessionCommand>,
        status: crate::session::SessionStatusHandle,
        config: &Config,
    ) -> Self {
        Self {
            port: config.server.port,
            session_state: SessionApiState { tx, status },
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(service_info))
            .route("/version", get(version))
            .merge(routes::session::router(self.session_state))
            .layer(ServiceBuilder::new());

        let listener = tokio::net::TcpListener::bind(&format!("127.0.0.1:{}", self.port)).await?;

        info!("API server listening on http://127.0.0.1:{}", self.port);
        info!("Endpoints:");
        info!("  GET  /           - Service info");
        info!("  GET  /version    - Version info");
        info!("  GET  /status     - Session state");
        info!("  POST /start      - Start a new recording");
        info!("  POST /pause      - Pause the recording");
        info!("  POST /resume     - Resume the recording");
        info!("  POST /stop       - Finalize the recording");
        info!("  POST /transform  - Rewrite the recording in a style");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "justtalk",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

async fn version() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "name": "justtalk"
    }))
}
