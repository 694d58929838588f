use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
};
use chrono::Utc;
use futures::Stream;

use crate::state::AppState;

/// SSE animation feed: a `connected` event on subscribe, then one `tick`
/// event per clock tick carrying the live track/marker snapshot.
pub async fn api_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let mut rx = state.sim.clone();

    let stream = async_stream::stream! {
        let hello = serde_json::json!({
            "type": "connected",
            "timestamp": Utc::now().timestamp_millis(),
        });
        yield Ok(SseEvent::default().event("connected").data(hello.to_string()));

        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            match serde_json::to_string(&snapshot) {
                Ok(data) => yield Ok(SseEvent::default().event("tick").data(data)),
                Err(_) => continue,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
