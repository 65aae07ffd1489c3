use serde::{Deserialize, Serialize};

/// One indexed chunk: the embedding and the text it was computed from travel
/// together, so there is no positional join to keep consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub embedding: Vec<f32>,
    pub text: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub distance: f32,
    pub text: String,
    pub source: String,
}

/// Exact flat index searched by squared Euclidean distance. Small enough for
/// a full scan per query; no ANN structure is warranted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatIndex {
    records: Vec<ChunkRecord>,
}

impl FlatIndex {
    pub fn push(&mut self, record: ChunkRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Nearest `top_k` records by squared L2 distance, closest first.
    /// Records whose dimension does not match the query are skipped.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        if self.records.is_empty() || query.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &ChunkRecord)> = self
            .records
            .iter()
            .filter(|r| r.embedding.len() == query.len())
            .map(|r| (squared_l2(query, &r.embedding), r))
            .collect();

        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(top_k)
            .map(|(distance, record)| ScoredChunk {
                distance,
                text: record.text.clone(),
                source: record.source.clone(),
            })
            .collect()
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
