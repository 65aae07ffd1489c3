use axum::{Json, extract::State};

use crate::dto::chat::{ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::models::Turn;
use crate::services::{llm, prompt};
use crate::state::AppState;

pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::Validation("Question cannot be empty".to_string()));
    }

    let subject = payload
        .subject
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "General".to_string());

    let api_key = { state.settings.lock().await.api_key.clone() };
    if api_key.trim().is_empty() {
        return Err(AppError::Validation(
            "No API key configured. Set one via /api/config first.".to_string(),
        ));
    }

    state.limiter.lock().await.try_acquire()?;

    let llm_config = &state.config.llm;

    // Retrieval: embed the question, then scan the flat index. The lock is
    // only held for the in-memory search, not the embedding call.
    let query_embedding = llm::embed_query(
        &llm_config.provider,
        &api_key,
        &llm_config.embedding_model,
        &question,
    )
    .await
    .map_err(AppError::Internal)?;

    let context_blocks: Vec<String> = {
        let store = state.store.lock().await;
        let hits = store
            .index
            .search(&query_embedding, state.config.retrieval.top_k);
        prompt::context_blocks(&hits)
    };

    let style = prompt::AnswerStyle::from_give_final(payload.give_final);
    let preamble = prompt::build_preamble(style, &subject, &context_blocks);

    // A failed LLM call surfaces as a chat error; the conversation is not
    // touched in that case.
    let answer = llm::complete(
        &llm_config.provider,
        &api_key,
        &llm_config.model,
        &preamble,
        &question,
    )
    .await
    .map_err(AppError::Internal)?;

    let turn = Turn {
        question,
        answer,
        subject,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let mut store = state.store.lock().await;
    let (conversation_id, history) = store.append_turn(payload.conversation_id.as_deref(), turn);

    state
        .snapshot
        .save(&store)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(ChatResponse {
        conversation_id,
        history,
    }))
}
