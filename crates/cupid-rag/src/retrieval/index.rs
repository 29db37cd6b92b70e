//! In-memory knowledge index with JSON snapshots

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::{Document, SearchHit};

const SNAPSHOT_VERSION: u32 = 1;

/// Documents and their question embeddings, immutable after construction
///
/// Identity of a document is its position; search ties keep that order.
#[derive(Debug)]
pub struct KnowledgeIndex {
    documents: Vec<Arc<Document>>,
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
    model: String,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    model: String,
    dimensions: usize,
    entries: Vec<SnapshotEntry>,
}

#[derive(Serialize, Deserialize)]
struct SnapshotEntry {
    question: String,
    answer: String,
    category: String,
    embedding: Vec<f32>,
}

impl KnowledgeIndex {
    /// Build from documents and matching embeddings
    ///
    /// All embeddings must share one dimension.
    pub fn new(
        documents: Vec<Document>,
        embeddings: Vec<Vec<f32>>,
        model: impl Into<String>,
    ) -> Result<Self> {
        if documents.len() != embeddings.len() {
            return Err(Error::index_unavailable(format!(
                "{} documents but {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if let Some(pos) = embeddings.iter().position(|e| e.len() != dimensions) {
            return Err(Error::index_unavailable(format!(
                "embedding {} has {} dimensions, expected {}",
                pos,
                embeddings[pos].len(),
                dimensions
            )));
        }

        Ok(Self {
            documents: documents.into_iter().map(Arc::new).collect(),
            embeddings,
            dimensions,
            model: model.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embedding model the vectors were produced with
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.documents
    }

    /// Top `k` documents by cosine similarity, best first
    ///
    /// CPU-bound; callers on the async runtime go through `SemanticSearch`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }
        if query.len() != self.dimensions {
            return Err(Error::embedding(format!(
                "query has {} dimensions, index has {}",
                query.len(),
                self.dimensions
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, embedding)| (i, cosine_similarity(query, embedding)))
            .collect();

        // stable: equal scores keep insertion order; NaN scores sort last
        scored.sort_by(|a, b| rank_key(b.1).total_cmp(&rank_key(a.1)));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(i, score)| SearchHit {
                document: Arc::clone(&self.documents[i]),
                score,
            })
            .collect())
    }

    /// Load a snapshot written by [`save`](Self::save)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(Error::index_unavailable(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }

        let (documents, embeddings): (Vec<_>, Vec<_>) = snapshot
            .entries
            .into_iter()
            .map(|e| (Document::new(e.question, e.answer, e.category), e.embedding))
            .unzip();

        let index = Self::new(documents, embeddings, snapshot.model)?;
        if !index.is_empty() && index.dimensions != snapshot.dimensions {
            return Err(Error::index_unavailable(format!(
                "snapshot declares {} dimensions but holds {}",
                snapshot.dimensions, index.dimensions
            )));
        }

        Ok(index)
    }

    /// Write a snapshot atomically (temp file in the same directory, then rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            model: self.model.clone(),
            dimensions: self.dimensions,
            entries: self
                .documents
                .iter()
                .zip(&self.embeddings)
                .map(|(doc, embedding)| SnapshotEntry {
                    question: doc.question.clone(),
                    answer: doc.answer.clone(),
                    category: doc.category.clone(),
                    embedding: embedding.clone(),
                })
                .collect(),
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut tmp, &snapshot)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
