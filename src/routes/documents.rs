use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::dto::document::{DocumentsResponse, UploadResponse};
use crate::errors::AppError;
use crate::services::{llm, pdf};
use crate::state::AppState;

pub const MAX_FILE_SIZE: usize = 50 * 1024 * 1024; // 50 MB

struct ProcessedDocument {
    filename: String,
    pages: usize,
    chunks: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let api_key = { state.settings.lock().await.api_key.clone() };
    if api_key.trim().is_empty() {
        return Err(AppError::Validation(
            "No API key configured. Set one via /api/config first.".to_string(),
        ));
    }

    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart data: {e}")))?
    {
        let filename = field.file_name().unwrap_or("unnamed.pdf").to_string();

        let content_type = field
            .content_type()
            .unwrap_or("application/pdf")
            .to_string();

        if content_type != "application/pdf" {
            return Err(AppError::Validation(
                "Only PDF files are supported".to_string(),
            ));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;

        if data.len() > MAX_FILE_SIZE {
            return Err(AppError::Validation(format!(
                "File too large. Maximum size is {} MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        files.push((filename, data.to_vec()));
    }

    if files.is_empty() {
        return Err(AppError::Validation("No file provided".to_string()));
    }

    let retrieval = &state.config.retrieval;
    let llm_config = &state.config.llm;

    // Extract, chunk and embed everything before touching the store so the
    // lock is never held across a provider call.
    let mut processed: Vec<ProcessedDocument> = Vec::with_capacity(files.len());
    for (filename, data) in files {
        let text = pdf::extract_text(&data)
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e:#}")))?;
        let pages = pdf::page_count(&data).unwrap_or(0);

        // A scanned PDF with no text layer yields zero chunks; the document
        // is still recorded with zero counts.
        let chunks: Vec<String> =
            pdf::chunk_text(&text, retrieval.chunk_size, retrieval.chunk_overlap)
                .filter(|c| !c.trim().is_empty())
                .collect();

        let embeddings = llm::embed_texts(
            &llm_config.provider,
            &api_key,
            &llm_config.embedding_model,
            &chunks,
        )
        .await
        .map_err(AppError::Internal)?;

        tracing::info!(
            "Extracted {} chunks from '{}' ({} pages)",
            chunks.len(),
            filename,
            pages
        );

        processed.push(ProcessedDocument {
            filename,
            pages,
            chunks,
            embeddings,
        });
    }

    let doc_count = processed.len();
    let chunk_count: usize = processed.iter().map(|d| d.chunks.len()).sum();

    let mut store = state.store.lock().await;
    for doc in processed {
        store
            .index_document(&doc.filename, doc.pages, doc.chunks, doc.embeddings)
            .map_err(AppError::Internal)?;
    }

    state
        .snapshot
        .save(&store)
        .await
        .map_err(AppError::Internal)?;

    Ok(Json(UploadResponse {
        message: format!("Indexed {doc_count} document(s), {chunk_count} chunks"),
    }))
}

pub async fn list(State(state): State<AppState>) -> Json<DocumentsResponse> {
    let store = state.store.lock().await;
    Json(DocumentsResponse {
        docs_meta: store.documents.clone(),
    })
}

pub async fn clear_index(
    State(state): State<AppState>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut store = state.store.lock().await;
    store.clear_index();

    state
        .snapshot
        .save(&store)
        .await
        .map_err(AppError::Internal)?;

    tracing::info!("Cleared vector index and document metadata");

    Ok(Json(UploadResponse {
        message: "Knowledge base cleared".to_string(),
    }))
}
