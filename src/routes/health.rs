use axum::{Json, extract::State};
use serde::Serialize;

use crate::models::StudyStore;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub documents: usize,
    pub indexed_chunks: usize,
}

impl HealthResponse {
    fn report(store: &StudyStore) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            documents: store.documents.len(),
            indexed_chunks: store.index.len(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.lock().await;
    Json(HealthResponse::report(&store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ChunkRecord;

    #[test]
    fn report_reflects_store_contents() {
        let mut store = StudyStore::default();
        store.record_document("notes.pdf", 4, 2);
        for i in 0..2 {
            store.index.push(ChunkRecord {
                embedding: vec![i as f32],
                text: format!("chunk {i}"),
                source: "notes.pdf".to_string(),
            });
        }

        let report = HealthResponse::report(&store);
        assert_eq!(report.status, "ok");
        assert_eq!(report.documents, 1);
        assert_eq!(report.indexed_chunks, 2);
    }
}
