use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::index::{ChunkRecord, FlatIndex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub filename: String,
    pub pages: usize,
    pub chunks: usize,
}

/// One question/answer exchange. Turns are append-only; they are never edited
/// or deleted individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
    pub subject: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub turns: Vec<Turn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub id: String,
    pub summary: String,
    pub subject: String,
    pub turn_count: usize,
    pub updated_at: String,
}

const SUMMARY_MAX_CHARS: usize = 80;
const HISTORY_LIST_LIMIT: usize = 20;

/// All mutable application state: the vector index, document metadata and
/// conversation history. Lives behind a single mutex in `AppState` and is
/// snapshotted wholesale after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyStore {
    pub index: FlatIndex,
    pub documents: Vec<DocumentMeta>,
    pub history: Vec<Conversation>,
}

impl StudyStore {
    pub fn record_document(&mut self, filename: &str, pages: usize, chunks: usize) {
        self.documents.push(DocumentMeta {
            filename: filename.to_string(),
            pages,
            chunks,
        });
    }

    /// Records a document and indexes its chunks. Chunks and embeddings must
    /// pair up one-to-one; a provider returning fewer vectors than inputs is
    /// an error, not a silently truncated index.
    pub fn index_document(
        &mut self,
        filename: &str,
        pages: usize,
        chunks: Vec<String>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<()> {
        anyhow::ensure!(
            chunks.len() == embeddings.len(),
            "Embedding count mismatch for '{filename}': {} chunks, {} embeddings",
            chunks.len(),
            embeddings.len()
        );

        self.record_document(filename, pages, chunks.len());
        for (text, embedding) in chunks.into_iter().zip(embeddings) {
            self.index.push(ChunkRecord {
                embedding,
                text,
                source: filename.to_string(),
            });
        }

        Ok(())
    }

    /// Appends a turn to the named conversation, creating a new one when the
    /// id is absent or unknown. Returns the conversation id and its turns.
    pub fn append_turn(
        &mut self,
        conversation_id: Option<&str>,
        turn: Turn,
    ) -> (String, Vec<Turn>) {
        let now = chrono::Utc::now().to_rfc3339();

        let existing = conversation_id.and_then(|id| self.history.iter().position(|c| c.id == id));

        match existing {
            Some(pos) => {
                let conv = &mut self.history[pos];
                conv.turns.push(turn);
                conv.updated_at = now;
                (conv.id.clone(), conv.turns.clone())
            }
            None => {
                let conv = Conversation {
                    id: Uuid::new_v4().to_string(),
                    created_at: now.clone(),
                    updated_at: now,
                    turns: vec![turn],
                };
                let id = conv.id.clone();
                let turns = conv.turns.clone();
                self.history.push(conv);
                (id, turns)
            }
        }
    }

    /// Drops the index and document metadata. Conversation history survives.
    pub fn clear_index(&mut self) {
        self.index.clear();
        self.documents.clear();
    }

    /// Most recently updated conversations, first-turn summaries, capped.
    pub fn recent_conversations(&self) -> Vec<ConversationSummary> {
        let mut summaries: Vec<ConversationSummary> = self
            .history
            .iter()
            .map(|conv| {
                let first = conv.turns.first();
                ConversationSummary {
                    id: conv.id.clone(),
                    summary: first
                        .map(|t| truncate_chars(&t.question, SUMMARY_MAX_CHARS))
                        .unwrap_or_default(),
                    subject: first.map(|t| t.subject.clone()).unwrap_or_default(),
                    turn_count: conv.turns.len(),
                    updated_at: conv.updated_at.clone(),
                }
            })
            .collect();

        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries.truncate(HISTORY_LIST_LIMIT);
        summaries
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(max).collect();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(question: &str) -> Turn {
        Turn {
            question: question.to_string(),
            answer: "because".to_string(),
            subject: "Physics".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn append_without_id_creates_a_conversation() {
        let mut store = StudyStore::default();
        let (id, turns) = store.append_turn(None, turn("why is the sky blue?"));

        assert!(!id.is_empty());
        assert_eq!(turns.len(), 1);
        assert_eq!(store.history.len(), 1);
    }

    #[test]
    fn append_with_existing_id_extends_without_duplicating() {
        let mut store = StudyStore::default();
        let (id, _) = store.append_turn(None, turn("first"));
        let (same_id, turns) = store.append_turn(Some(&id), turn("second"));

        assert_eq!(id, same_id);
        assert_eq!(turns.len(), 2);
        assert_eq!(store.history.len(), 1);
    }

    #[test]
    fn append_with_unknown_id_creates_a_fresh_conversation() {
        let mut store = StudyStore::default();
        store.append_turn(None, turn("first"));
        let (new_id, turns) = store.append_turn(Some("no-such-id"), turn("second"));

        assert_ne!(new_id, "no-such-id");
        assert_eq!(turns.len(), 1);
        assert_eq!(store.history.len(), 2);
    }

    #[test]
    fn index_document_pairs_chunks_with_embeddings() {
        let mut store = StudyStore::default();
        store
            .index_document(
                "notes.pdf",
                2,
                vec!["alpha".to_string(), "beta".to_string()],
                vec![vec![1.0], vec![2.0]],
            )
            .unwrap();

        assert_eq!(store.documents.len(), 1);
        assert_eq!(store.documents[0].chunks, 2);
        assert_eq!(store.index.len(), 2);

        let hits = store.index.search(&[2.0], 1);
        assert_eq!(hits[0].text, "beta");
        assert_eq!(hits[0].source, "notes.pdf");
    }

    #[test]
    fn index_document_rejects_mismatched_embedding_counts() {
        let mut store = StudyStore::default();
        let result = store.index_document(
            "notes.pdf",
            2,
            vec!["alpha".to_string(), "beta".to_string()],
            vec![vec![1.0]],
        );

        assert!(result.is_err());
        assert!(store.documents.is_empty());
        assert!(store.index.is_empty());
    }

    #[test]
    fn zero_chunk_document_is_still_recorded() {
        let mut store = StudyStore::default();
        store
            .index_document("scanned.pdf", 5, Vec::new(), Vec::new())
            .unwrap();

        assert_eq!(store.documents[0].chunks, 0);
        assert_eq!(store.documents[0].pages, 5);
        assert!(store.index.is_empty());
    }

    #[test]
    fn clear_index_resets_documents_but_keeps_history() {
        let mut store = StudyStore::default();
        store.index.push(ChunkRecord {
            embedding: vec![1.0],
            text: "chunk".to_string(),
            source: "a.pdf".to_string(),
        });
        store.record_document("a.pdf", 3, 1);
        store.append_turn(None, turn("q"));

        store.clear_index();

        assert!(store.index.is_empty());
        assert!(store.documents.is_empty());
        assert_eq!(store.history.len(), 1);
        assert!(store.index.search(&[1.0], 5).is_empty());
    }

    #[test]
    fn recent_conversations_caps_and_orders_by_recency() {
        let mut store = StudyStore::default();
        for i in 0..25 {
            store.history.push(Conversation {
                id: format!("conv-{i}"),
                created_at: format!("2026-08-01T00:00:{i:02}Z"),
                updated_at: format!("2026-08-01T00:00:{i:02}Z"),
                turns: vec![turn(&format!("question {i}"))],
            });
        }

        let summaries = store.recent_conversations();
        assert_eq!(summaries.len(), 20);
        assert_eq!(summaries[0].id, "conv-24");
        assert_eq!(summaries[0].summary, "question 24");
    }

    #[test]
    fn long_first_questions_are_truncated_in_summaries() {
        let mut store = StudyStore::default();
        store.append_turn(None, turn(&"x".repeat(200)));

        let summaries = store.recent_conversations();
        assert_eq!(summaries[0].summary.chars().count(), 81);
    }
}
