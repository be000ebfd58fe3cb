//! HTTP handlers for enqueue, drain and health.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::{Json, Router};
use bridge_core::wire::{
    EnqueueAck, HealthStatus, ENQUEUE_PATH, HEALTH_PATH, JOBS_PATH, SECRET_HEADER,
};
use bridge_core::{parse_enqueue_body, Job};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ENQUEUE_PATH, post(enqueue))
        .route(JOBS_PATH, get(drain_jobs))
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DrainParams {
    key: Option<String>,
}

/// True when the declared media type is `application/json`. Parameters such
/// as `charset` are ignored.
fn is_json_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

/// Append one job. The secret is checked before the body is looked at.
async fn enqueue(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<EnqueueAck>> {
    let presented = headers.get(SECRET_HEADER).and_then(|v| v.to_str().ok());
    if !state.secret.matches(presented) {
        tracing::warn!("enqueue rejected: bad secret");
        return Err(ServerError::Unauthorized);
    }

    if !is_json_body(&headers) {
        return Err(ServerError::BadRequest(
            "body is not declared as application/json".to_string(),
        ));
    }
    let job = parse_enqueue_body(&body)?;
    let pending = state.queue.push(job);
    tracing::info!(action = %job.action, user_id = job.user_id, pending, "job queued");

    Ok(Json(EnqueueAck::queued()))
}

/// Hand every pending job to the poller and forget them.
async fn drain_jobs(
    State(state): State<AppState>,
    params: Result<Query<DrainParams>, QueryRejection>,
) -> ServerResult<Json<Vec<Job>>> {
    // An unparseable query carries no usable key
    let key = params.ok().and_then(|Query(p)| p.key);
    if !state.secret.matches(key.as_deref()) {
        tracing::warn!("drain rejected: bad key");
        return Err(ServerError::Unauthorized);
    }

    let jobs = state.queue.drain();
    if !jobs.is_empty() {
        tracing::info!(count = jobs.len(), "jobs drained");
    }
    Ok(Json(jobs))
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        pending: state.queue.len(),
    })
}
