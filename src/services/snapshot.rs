use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::index::FlatIndex;
use crate::models::{Conversation, DocumentMeta, StudyStore};
use crate::services::storage::StorageService;

pub const INDEX_KEY: &str = "state/index.json";
pub const DOCUMENTS_KEY: &str = "state/documents.json";
pub const HISTORY_KEY: &str = "state/history.json";

/// Full-state snapshot persistence: every save re-serializes and re-uploads
/// all blobs; every load restores them wholesale. There is no transactional
/// guarantee across blobs — a crash mid-save can leave them mutually
/// inconsistent, which this design accepts.
#[derive(Clone)]
pub struct SnapshotStore {
    storage: Arc<StorageService>,
}

impl SnapshotStore {
    pub fn new(storage: Arc<StorageService>) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<StudyStore> {
        let index: FlatIndex = self.load_blob(INDEX_KEY).await?;
        let documents: Vec<DocumentMeta> = self.load_blob(DOCUMENTS_KEY).await?;
        let history: Vec<Conversation> = self.load_blob(HISTORY_KEY).await?;

        Ok(StudyStore {
            index,
            documents,
            history,
        })
    }

    pub async fn save(&self, store: &StudyStore) -> Result<()> {
        self.save_blob(INDEX_KEY, &store.index).await?;
        self.save_blob(DOCUMENTS_KEY, &store.documents).await?;
        self.save_blob(HISTORY_KEY, &store.history).await?;
        Ok(())
    }

    async fn load_blob<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.storage.download_opt(key).await? {
            Some(bytes) => decode_blob(&bytes, key),
            None => {
                tracing::info!("No snapshot blob at '{key}', starting empty");
                Ok(T::default())
            }
        }
    }

    async fn save_blob<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = encode_blob(value, key)?;
        self.storage.upload(key, bytes, "application/json").await
    }
}

pub fn encode_blob<T: Serialize>(value: &T, key: &str) -> Result<Vec<u8>> {
    serde_json::to_vec(value).with_context(|| format!("Failed to serialize '{key}'"))
}

pub fn decode_blob<T: DeserializeOwned>(bytes: &[u8], key: &str) -> Result<T> {
    serde_json::from_slice(bytes).with_context(|| format!("Failed to deserialize '{key}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ChunkRecord;
    use crate::models::Turn;

    fn populated_store() -> StudyStore {
        let mut store = StudyStore::default();
        store.index.push(ChunkRecord {
            embedding: vec![0.25, -1.5, 3.0],
            text: "mitochondria are the powerhouse".to_string(),
            source: "biology.pdf".to_string(),
        });
        store.record_document("biology.pdf", 12, 1);
        store.append_turn(
            None,
            Turn {
                question: "what is a mitochondrion?".to_string(),
                answer: "an organelle".to_string(),
                subject: "Biology".to_string(),
                timestamp: "2026-08-26T10:00:00Z".to_string(),
            },
        );
        store
    }

    #[test]
    fn snapshot_blobs_round_trip() {
        let store = populated_store();

        let index_bytes = encode_blob(&store.index, INDEX_KEY).unwrap();
        let docs_bytes = encode_blob(&store.documents, DOCUMENTS_KEY).unwrap();
        let history_bytes = encode_blob(&store.history, HISTORY_KEY).unwrap();

        let restored = StudyStore {
            index: decode_blob(&index_bytes, INDEX_KEY).unwrap(),
            documents: decode_blob(&docs_bytes, DOCUMENTS_KEY).unwrap(),
            history: decode_blob(&history_bytes, HISTORY_KEY).unwrap(),
        };

        assert_eq!(restored, store);
    }

    #[test]
    fn empty_store_round_trips_to_default() {
        let store = StudyStore::default();
        let bytes = encode_blob(&store.index, INDEX_KEY).unwrap();
        let restored: FlatIndex = decode_blob(&bytes, INDEX_KEY).unwrap();
        assert_eq!(restored, FlatIndex::default());
    }

    #[test]
    fn corrupt_blob_is_an_error_not_a_default() {
        let result: Result<FlatIndex> = decode_blob(b"not json", INDEX_KEY);
        assert!(result.is_err());
    }
}
