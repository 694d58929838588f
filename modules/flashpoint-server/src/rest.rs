use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;

use flashpoint_feed::aggregate;
use flashpoint_sim::{default_catalog, synthesize};

use crate::state::AppState;

/// Aggregated, deduplicated news timeline. Per-adapter failures are
/// recovered upstream — zero healthy sources still yields a well-formed
/// empty feed, never an error.
pub async fn api_news(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let events = aggregate(&state.adapters, state.feed_cap, state.fetch_timeout).await;
    Json(serde_json::json!({
        "events": events,
        "count": events.len(),
        "updatedAt": Utc::now().to_rfc3339(),
    }))
}

/// Fresh synthesized strike picture: one batch of tracks plus the merged
/// auxiliary timeline, sorted descending by time.
pub async fn api_strikes(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = default_catalog();
    let now_ms = Utc::now().timestamp_millis();
    let mut rng = rand::rng();
    match synthesize(
        &catalog,
        state.batch_size,
        state.arc_points,
        now_ms,
        &mut rng,
    ) {
        Ok((tracks, events)) => Json(serde_json::json!({
            "tracks": tracks,
            "events": events,
            "lastUpdate": Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            warn!(error = %e, "Strike synthesis failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "internal error" })),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub id: String,
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

/// Translation enrichment. At most one request per event id may be
/// pending; a concurrent duplicate is rejected, never queued. An upstream
/// failure degrades to the original text. The permit releases the id when
/// the handler future is dropped, so a client disconnect mid-request does
/// not wedge the event in a permanently-pending state.
pub async fn api_translate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> impl IntoResponse {
    let Some(_permit) = state.pending.begin(&req.id) else {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({ "error": "translation already pending" })),
        )
            .into_response();
    };

    let translated = match state
        .translator
        .translate(&req.text, &req.source_lang, &req.target_lang)
        .await
    {
        Ok(t) => t,
        Err(e) => {
            warn!(id = %req.id, error = %e, "Translation failed, keeping original");
            req.text.clone()
        }
    };

    Json(serde_json::json!({
        "id": req.id,
        "translated": translated,
    }))
    .into_response()
}
