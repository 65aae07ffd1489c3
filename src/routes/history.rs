use axum::{Json, extract::State};
use serde::Serialize;

use crate::models::ConversationSummary;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Most recent conversations with first-turn summaries, capped to 20.
pub async fn list(State(state): State<AppState>) -> Json<HistoryResponse> {
    let store = state.store.lock().await;
    Json(HistoryResponse {
        conversations: store.recent_conversations(),
    })
}
