use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use corkboard_core::{ImportReport, MessageBoard, NewMessage};
use corkboard_shared::Message;

use crate::error::ServerError;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<MessageBoard>,
}

pub fn build_router(state: AppState, static_dir: &FsPath) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/messages", get(list_messages).post(post_message))
        .route("/messages/:id/reactions", post(post_reaction))
        .route("/import", post(import_messages))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Wire shape of a message; ids travel as strings.
#[derive(Serialize)]
struct ApiMessage {
    id: String,
    content: String,
    author: String,
    timestamp: String,
    repository: String,
    reference_url: Option<String>,
}

impl From<Message> for ApiMessage {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.map(|id| id.to_string()).unwrap_or_default(),
            content: message.content,
            author: message.author,
            timestamp: message.timestamp.to_rfc3339(),
            repository: message.repository,
            reference_url: message.reference_url,
        }
    }
}

#[derive(Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

#[derive(Deserialize)]
struct PostMessagePayload {
    content: Option<String>,
    author: Option<String>,
    repository: Option<String>,
}

#[derive(Deserialize)]
struct ReactionPayload {
    reaction: Option<String>,
}

#[derive(Serialize)]
struct ReactionResponse {
    count: u64,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn list_messages(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ApiMessage>>, ServerError> {
    let messages = state.board.list(params.limit).await?;
    Ok(Json(messages.into_iter().map(ApiMessage::from).collect()))
}

async fn post_message(
    State(state): State<AppState>,
    Json(payload): Json<PostMessagePayload>,
) -> Result<Json<ApiMessage>, ServerError> {
    let message = state
        .board
        .post(NewMessage {
            content: payload.content.unwrap_or_default(),
            author: payload.author,
            repository: payload.repository,
            timestamp: None,
        })
        .await?;

    Ok(Json(message.into()))
}

async fn post_reaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReactionPayload>,
) -> Result<Json<ReactionResponse>, ServerError> {
    let count = state
        .board
        .react(id, payload.reaction.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(ReactionResponse { count }))
}

async fn import_messages(
    State(state): State<AppState>,
) -> Result<Json<ImportReport>, ServerError> {
    let report = state.board.import().await?;
    info!(fetched = report.fetched, inserted = report.inserted, "import finished");
    Ok(Json(report))
}

pub async fn serve(
    state: AppState,
    static_dir: &FsPath,
    addr: std::net::SocketAddr,
) -> anyhow::Result<()> {
    let app = build_router(state, static_dir);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
