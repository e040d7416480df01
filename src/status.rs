use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::info;

use crate::credentials::MAX_IDENTITIES;
use crate::fleet::Fleet;

#[derive(Clone)]
pub struct StatusState {
    pub identities: Arc<Vec<u8>>,
    pub fleet: Arc<Fleet>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub message: &'static str,
    pub total_bots: u8,
    pub active_bots: usize,
    pub status: &'static str,
    pub timestamp: String,
    pub bots: Vec<BotEntry>,
}

#[derive(Serialize)]
pub struct BotEntry {
    pub id: u8,
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotList {
    pub total_bots: usize,
    pub bots: Vec<BotId>,
}

#[derive(Serialize)]
pub struct BotId {
    pub id: u8,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

async fn root(State(state): State<StatusState>) -> Json<SystemStatus> {
    let online = state.fleet.online().await;
    let bots = state
        .identities
        .iter()
        .map(|id| BotEntry {
            id: *id,
            status: if online.contains(id) { "Active" } else { "Offline" },
        })
        .collect();

    Json(SystemStatus {
        message: "🎵 Discord Music Bot System Active",
        total_bots: MAX_IDENTITIES,
        active_bots: state.identities.len(),
        status: "Running 24/7",
        timestamp: now(),
        bots,
    })
}

async fn health() -> (StatusCode, Json<Health>) {
    (
        StatusCode::OK,
        Json(Health {
            status: "OK",
            timestamp: now(),
        }),
    )
}

async fn bots(State(state): State<StatusState>) -> Json<BotList> {
    Json(BotList {
        total_bots: state.identities.len(),
        bots: state.identities.iter().map(|id| BotId { id: *id }).collect(),
    })
}

pub fn build_router(state: StatusState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/bots", get(bots))
        .with_state(state)
}

pub async fn serve(listener: tokio::net::TcpListener, state: StatusState) -> std::io::Result<()> {
    axum::serve(listener, build_router(state)).await
}

pub async fn bind(port: u16) -> std::io::Result<tokio::net::TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "status server listening");
    Ok(listener)
}
