//! HTTP receiver - one POST endpoint for envelopes, one health endpoint.
//!
//! # リクエストフロー
//! 1. body を `codec::decode`（失敗 → 400、session は作らない）
//! 2. `CorrelationContext::extract` → `TaskSession::open`
//! 3. `Router::route`（別 task で実行、session span 内）
//! 4. 200 `{"result": RouteResult}`
//!
//! Routing runs on its own tokio task, so a slow handler never blocks
//! unrelated events and a client disconnect never cuts a task short.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Json;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

use tasklane_core::codec;
use tasklane_core::{CorrelationContext, RouteResult, Router, TaskSession};
use tasklane_core::session::Publisher;

pub const HEALTH_PATH: &str = "/health";

#[derive(Clone)]
pub struct ReceiverState {
    router: Arc<Router>,
    publisher: Publisher,
    service_name: Arc<str>,
}

impl ReceiverState {
    pub fn new(router: Router, publisher: Publisher, service_name: &str) -> Self {
        Self {
            router: Arc::new(router),
            publisher,
            service_name: Arc::from(service_name),
        }
    }
}

#[derive(Debug, Serialize)]
struct Ack {
    result: RouteResult,
}

#[derive(Debug, Serialize)]
struct Rejection {
    error: String,
}

pub fn app(path: &str, state: ReceiverState) -> axum::Router {
    axum::Router::new()
        .route(path, post(receive))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn receive(State(state): State<ReceiverState>, body: Bytes) -> Response {
    let envelope = match codec::decode(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(error = %err, bytes = body.len(), "rejecting undecodable envelope");
            let rejection = Rejection {
                error: err.to_string(),
            };
            return (StatusCode::BAD_REQUEST, Json(rejection)).into_response();
        }
    };

    let context = CorrelationContext::extract(&envelope, &state.service_name);
    let session = TaskSession::open(context, &envelope, state.publisher.clone());
    let span = session.logger().clone();

    // Runs detached: a dropped connection must not cancel a started task.
    let router = state.router.clone();
    let routing = tokio::spawn(
        async move { router.route(&session, &envelope).await }.instrument(span),
    );

    match routing.await {
        Ok(result) => (StatusCode::OK, Json(Ack { result })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "routing task failed");
            let rejection = Rejection {
                error: err.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(rejection)).into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
