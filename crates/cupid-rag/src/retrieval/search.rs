//! Cached semantic search over the knowledge index

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::SearchHit;

use super::cache::{CacheStats, QueryCache};
use super::index::KnowledgeIndex;

/// Query-to-documents search with a result cache
///
/// Similarity scoring runs on the blocking pool, at most `workers` searches
/// at a time, so request handlers never stall the runtime.
pub struct SemanticSearch {
    index: Arc<KnowledgeIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    cache: QueryCache,
    permits: Arc<Semaphore>,
}

impl SemanticSearch {
    pub fn new(
        index: Arc<KnowledgeIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        cache_capacity: usize,
        workers: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            cache: QueryCache::new(cache_capacity),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Ranked documents for `query`; failures are logged and yield no hits
    pub async fn similarity_search(&self, query: &str, k: usize) -> Arc<Vec<SearchHit>> {
        match self.try_search(query, k).await {
            Ok(hits) => hits,
            Err(e) => {
                tracing::warn!("Similarity search failed: {}", e);
                Arc::new(Vec::new())
            }
        }
    }

    /// Like [`similarity_search`](Self::similarity_search) but surfaces errors
    pub async fn try_search(&self, query: &str, k: usize) -> Result<Arc<Vec<SearchHit>>> {
        let normalized = QueryCache::normalize(query);

        if let Some(hits) = self.cache.get(&normalized, k) {
            tracing::debug!("Search cache hit for {:?} (k={})", normalized, k);
            return Ok(hits);
        }

        let start = Instant::now();
        let embedding = self.embedder.embed(&normalized).await?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::internal("search worker pool closed"))?;

        let index = Arc::clone(&self.index);
        let hits = tokio::task::spawn_blocking(move || index.search(&embedding, k))
            .await
            .map_err(|e| Error::internal(format!("search worker failed: {}", e)))??;

        let hits = Arc::new(hits);
        self.cache.insert(normalized, k, Arc::clone(&hits));

        tracing::debug!(
            "Search returned {} hits in {}ms",
            hits.len(),
            start.elapsed().as_millis()
        );

        Ok(hits)
    }
}
