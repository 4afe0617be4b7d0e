use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use mirror::{
    Level, LinesCleared, MirrorState, Mode, NextTetromino, Reading, Render, Score, SlotSpec,
    WriteAck,
};
use serde::de::IgnoredAny;
use tracing::{debug, warn};

use crate::cors;
use crate::engine::EngineClient;

#[derive(Clone)]
pub struct AppState {
    pub mirror: Arc<MirrorState>,
    pub engine: EngineClient,
}

impl AppState {
    pub fn new(engine: EngineClient) -> Self {
        Self {
            mirror: Arc::new(MirrorState::new()),
            engine,
        }
    }
}

/// Every route is served at the root and again under `/api`, which is where
/// the engine pushes its updates.
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/board", get(board))
        .route("/keypress", post(keypress))
        .route("/mode", slot_routes::<Mode>())
        .route("/next_tetromino", slot_routes::<NextTetromino>())
        .route("/render", slot_routes::<Render>())
        .route("/statistics/level", slot_routes::<Level>())
        .route("/statistics/lines_cleared", slot_routes::<LinesCleared>())
        .route("/statistics/score", slot_routes::<Score>());

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .with_state(state)
        .layer(cors::layer())
}

fn slot_routes<S: SlotSpec>() -> axum::routing::MethodRouter<AppState> {
    get(read_slot::<S>).post(write_slot::<S>)
}

async fn health() -> &'static str {
    "ok"
}

async fn write_slot<S: SlotSpec>(
    State(state): State<AppState>,
    body: Bytes,
) -> (StatusCode, Json<WriteAck>) {
    match S::write(&state.mirror, &body) {
        Ok(()) => {
            debug!(slot = S::NAME, "slot updated");
            (StatusCode::OK, Json(WriteAck::success(S::RECEIVED)))
        }
        Err(err) => {
            warn!(slot = S::NAME, error = %err, "rejected slot write");
            (StatusCode::BAD_REQUEST, Json(WriteAck::failure()))
        }
    }
}

async fn read_slot<S: SlotSpec>(State(state): State<AppState>) -> Json<Reading<S::Value>> {
    debug!(slot = S::NAME, "slot read");
    Json(S::read(&state.mirror))
}

async fn keypress(State(state): State<AppState>, body: Bytes) -> Response {
    if let Err(err) = serde_json::from_slice::<IgnoredAny>(&body) {
        warn!(error = %err, "rejected keypress body");
        return (StatusCode::BAD_REQUEST, Json(WriteAck::failure())).into_response();
    }

    match state.engine.forward_keypress(body).await {
        Ok(forwarded) => forwarded.into_json_response(HeaderMap::new()),
        Err(err) => err.into_response(),
    }
}

async fn board(State(state): State<AppState>) -> Response {
    match state.engine.load_board().await {
        Ok(forwarded) => {
            let cache_headers = forwarded.cache_headers();
            forwarded.into_json_response(cache_headers)
        }
        Err(err) => err.into_response(),
    }
}
