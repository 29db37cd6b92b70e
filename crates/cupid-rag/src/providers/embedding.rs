//! Embedding provider trait for turning text into vectors

use async_trait::async_trait;
use crate::error::{Error, Result};

/// Trait for generating text embeddings
///
/// Used both to embed the corpus questions when the knowledge index is built
/// and to embed incoming queries on a cache miss.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts, preserving order
    ///
    /// Default implementation calls `embed` sequentially.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Model identifier recorded in index snapshots
    fn model(&self) -> &str;

    /// Check if the provider is healthy and available
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Reject empty or non-finite vectors before they reach the index
pub fn ensure_usable(vector: &[f32]) -> Result<()> {
    if vector.is_empty() {
        return Err(Error::embedding("provider returned an empty vector"));
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(Error::embedding("provider returned non-finite values"));
    }
    Ok(())
}
