//! Load-or-build for the knowledge index

use std::path::Path;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::retrieval::KnowledgeIndex;

use super::parser::CorpusParser;

/// Produces the startup knowledge index
pub struct KnowledgeIndexBuilder;

impl KnowledgeIndexBuilder {
    /// Load the snapshot at `index_path`, or parse and embed the corpus and
    /// snapshot the result
    ///
    /// A snapshot that exists but cannot be read is rebuilt from the corpus.
    /// Only when neither source yields an index is `IndexUnavailable` returned.
    pub async fn build_or_load(
        corpus_path: &Path,
        index_path: &Path,
        embedder: &dyn EmbeddingProvider,
    ) -> Result<KnowledgeIndex> {
        if index_path.exists() {
            match KnowledgeIndex::load(index_path) {
                Ok(index) => {
                    if index.model() != embedder.model() {
                        tracing::warn!(
                            "Index snapshot was built with '{}' but the configured embedding model is '{}'",
                            index.model(),
                            embedder.model()
                        );
                    }
                    tracing::info!(
                        "Loaded knowledge index from {} ({} documents, {} dimensions)",
                        index_path.display(),
                        index.len(),
                        index.dimensions()
                    );
                    return Ok(index);
                }
                Err(e) => {
                    tracing::warn!(
                        "Could not load index snapshot {}: {}. Rebuilding from corpus",
                        index_path.display(),
                        e
                    );
                }
            }
        }

        let index = Self::build(corpus_path, embedder).await?;

        if let Err(e) = index.save(index_path) {
            // serving from memory still works
            tracing::warn!("Failed to write index snapshot {}: {}", index_path.display(), e);
        } else {
            tracing::info!("Saved knowledge index to {}", index_path.display());
        }

        Ok(index)
    }

    /// Parse and embed the corpus
    pub async fn build(corpus_path: &Path, embedder: &dyn EmbeddingProvider) -> Result<KnowledgeIndex> {
        let start = Instant::now();
        let parsed = CorpusParser::parse_file(corpus_path)?;

        if parsed.documents.is_empty() {
            return Err(Error::index_unavailable(format!(
                "corpus {} contains no Q/A pairs",
                corpus_path.display()
            )));
        }

        tracing::info!(
            "Parsed {} documents in {} categories from {} ({} lines skipped)",
            parsed.documents.len(),
            parsed.categories.len(),
            corpus_path.display(),
            parsed.skipped_lines
        );

        let questions: Vec<String> = parsed.documents.iter().map(|d| d.question.clone()).collect();
        let embeddings = embedder
            .embed_batch(&questions)
            .await
            .map_err(|e| Error::index_unavailable(format!("embedding the corpus failed: {}", e)))?;

        let index = KnowledgeIndex::new(parsed.documents, embeddings, embedder.model())?;

        tracing::info!(
            "Built knowledge index with {} documents in {}ms",
            index.len(),
            start.elapsed().as_millis()
        );

        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct LengthEmbedder {
        calls: AtomicUsize,
        model: &'static str,
    }

    #[async_trait]
    impl EmbeddingProvider for LengthEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.chars().count() as f32, 1.0])
        }

        fn model(&self) -> &str {
            self.model
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "length"
        }
    }

    fn embedder(model: &'static str) -> LengthEmbedder {
        LengthEmbedder {
            calls: AtomicUsize::new(0),
            model,
        }
    }

    const CORPUS: &str = "[Giao tiếp & Hẹn hò]\n\nQ: Họ trả lời chậm?\nA: Kiên nhẫn.\nQ: Rủ đi đâu?\nA: Cà phê.\n";

    #[tokio::test]
    async fn test_builds_then_loads_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        let snapshot = dir.path().join("index.json");
        std::fs::write(&corpus, CORPUS).unwrap();

        let first = embedder("m");
        let index = KnowledgeIndexBuilder::build_or_load(&corpus, &snapshot, &first)
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(first.calls.load(Ordering::SeqCst), 2);
        assert!(snapshot.exists());

        // corpus is not consulted again once a snapshot exists
        std::fs::remove_file(&corpus).unwrap();
        let second = embedder("other-model");
        let loaded = KnowledgeIndexBuilder::build_or_load(&corpus, &snapshot, &second)
            .await
            .unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.model(), "m");
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_rebuilt() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        let snapshot = dir.path().join("index.json");
        std::fs::write(&corpus, CORPUS).unwrap();
        std::fs::write(&snapshot, "{ truncated").unwrap();

        let index = KnowledgeIndexBuilder::build_or_load(&corpus, &snapshot, &embedder("m"))
            .await
            .unwrap();
        assert_eq!(index.len(), 2);
        assert!(KnowledgeIndex::load(&snapshot).is_ok());
    }

    #[tokio::test]
    async fn test_missing_everything_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = KnowledgeIndexBuilder::build_or_load(
            &dir.path().join("missing.txt"),
            &dir.path().join("index.json"),
            &embedder("m"),
        )
        .await;
        assert!(matches!(result, Err(Error::IndexUnavailable(_))));
    }

    #[tokio::test]
    async fn test_empty_corpus_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("corpus.txt");
        std::fs::write(&corpus, "[Only a category]\n").unwrap();
        let result =
            KnowledgeIndexBuilder::build_or_load(&corpus, &dir.path().join("i.json"), &embedder("m"))
                .await;
        assert!(matches!(result, Err(Error::IndexUnavailable(_))));
    }
}
