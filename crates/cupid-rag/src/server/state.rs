//! Application state for the answer server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::extraction::SlotExtractor;
use crate::generation::{AnswerSynthesizer, PipelineSettings};
use crate::ingestion::KnowledgeIndexBuilder;
use crate::learning::FeedbackStore;
use crate::providers::{
    EmbeddingProvider, HttpMatchGateway, LlmProvider, MatchGateway, OllamaProvider,
};
use crate::retrieval::SemanticSearch;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Answer pipeline (owns index, cache and model clients)
    synthesizer: AnswerSynthesizer,
    /// Feedback log
    feedback: FeedbackStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state with Ollama and the HTTP match service
    ///
    /// Fails with `IndexUnavailable` when no knowledge index can be produced.
    pub async fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        let (embedder, llm) = OllamaProvider::new(&config.llm)?.split();
        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
        let llm: Arc<dyn LlmProvider> = Arc::new(llm);
        tracing::info!(
            "Ollama providers initialized (embeddings: {}, generation: {})",
            embedder.model(),
            llm.model()
        );

        let gateway: Arc<dyn MatchGateway> = Arc::new(HttpMatchGateway::new(&config.matching)?);
        tracing::info!("Match service at {}", config.matching.url);

        Self::with_providers(config, embedder, llm, gateway).await
    }

    /// Create application state from explicit providers
    pub async fn with_providers(
        config: RagConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
        gateway: Arc<dyn MatchGateway>,
    ) -> Result<Self> {
        let index = KnowledgeIndexBuilder::build_or_load(
            &config.knowledge.corpus_path,
            &config.knowledge.index_path,
            embedder.as_ref(),
        )
        .await?;

        let workers = config.retrieval.worker_count();
        let search = SemanticSearch::new(
            Arc::new(index),
            embedder,
            config.retrieval.cache_capacity,
            workers,
        );
        tracing::info!(
            "Search ready ({} workers, cache capacity {})",
            workers,
            config.retrieval.cache_capacity
        );

        let extractor = SlotExtractor::new(Arc::clone(&llm), config.llm.extraction.clone());
        let synthesizer = AnswerSynthesizer::new(
            Arc::new(search),
            extractor,
            gateway,
            llm,
            PipelineSettings::from_config(&config),
        );

        let feedback = FeedbackStore::new(config.feedback.path.clone());
        tracing::info!("Feedback log at {}", feedback.path().display());

        Ok(Self::from_parts(config, synthesizer, feedback))
    }

    /// Assemble state from an already built pipeline
    pub fn from_parts(
        config: RagConfig,
        synthesizer: AnswerSynthesizer,
        feedback: FeedbackStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                synthesizer,
                feedback,
                ready: RwLock::new(true),
            }),
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    pub fn synthesizer(&self) -> &AnswerSynthesizer {
        &self.inner.synthesizer
    }

    pub fn feedback(&self) -> &FeedbackStore {
        &self.inner.feedback
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
