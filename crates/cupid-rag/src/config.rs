//! Configuration for the answer service

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Knowledge corpus and index snapshot locations
    pub knowledge: KnowledgeConfig,
    /// Retrieval and cache tuning
    pub retrieval: RetrievalConfig,
    /// External match service
    pub matching: MatchingConfig,
    /// Feedback log
    pub feedback: FeedbackConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Apply overrides from well-known environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("CUPID_RAG_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CUPID_RAG_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("CUPID_RAG_PORT is not a port: {}", port)))?;
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            self.llm.base_url = url;
        }
        if let Ok(url) = std::env::var("MATCH_API_URL") {
            self.matching.url = url;
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8081,
            enable_cors: true,
        }
    }
}

/// Decoding parameters for one generation mode
///
/// In TOML each profile is an overlay: fields left out keep that profile's
/// own defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodingParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling cutoff
    pub top_p: Option<f32>,
    /// Maximum generated tokens
    pub max_tokens: u32,
    /// Penalty applied to repeated tokens
    pub repeat_penalty: Option<f32>,
    /// Wall-clock budget for a single call
    pub timeout_secs: u64,
}

impl DecodingParams {
    /// Near-deterministic, short output for structured extraction
    pub fn extraction() -> Self {
        Self {
            temperature: 0.0,
            top_p: None,
            max_tokens: 100,
            repeat_penalty: Some(1.1),
            timeout_secs: 20,
        }
    }

    /// Moderate randomness with a repetition penalty for answer synthesis
    pub fn synthesis() -> Self {
        Self {
            temperature: 0.3,
            top_p: Some(0.8),
            max_tokens: 200,
            repeat_penalty: Some(1.2),
            timeout_secs: 60,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self::synthesis()
    }
}

/// Fields given for a profile in the config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecodingOverrides {
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_tokens: Option<u32>,
    repeat_penalty: Option<f32>,
    timeout_secs: Option<u64>,
}

impl DecodingOverrides {
    fn apply(self, base: DecodingParams) -> DecodingParams {
        DecodingParams {
            temperature: self.temperature.unwrap_or(base.temperature),
            top_p: self.top_p.or(base.top_p),
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            repeat_penalty: self.repeat_penalty.or(base.repeat_penalty),
            timeout_secs: self.timeout_secs.unwrap_or(base.timeout_secs),
        }
    }
}

fn extraction_profile<'de, D>(deserializer: D) -> std::result::Result<DecodingParams, D::Error>
where
    D: Deserializer<'de>,
{
    DecodingOverrides::deserialize(deserializer).map(|o| o.apply(DecodingParams::extraction()))
}

fn synthesis_profile<'de, D>(deserializer: D) -> std::result::Result<DecodingParams, D::Error>
where
    D: Deserializer<'de>,
{
    DecodingOverrides::deserialize(deserializer).map(|o| o.apply(DecodingParams::synthesis()))
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed embedding requests
    pub max_retries: u32,
    /// Decoding profile for slot extraction
    #[serde(deserialize_with = "extraction_profile")]
    pub extraction: DecodingParams,
    /// Decoding profile for answer synthesis
    #[serde(deserialize_with = "synthesis_profile")]
    pub synthesis: DecodingParams,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "bge-m3".to_string(), // multilingual, handles Vietnamese
            generate_model: "llama3.1:8b".to_string(),
            timeout_secs: 120,
            max_retries: 2,
            extraction: DecodingParams::extraction(),
            synthesis: DecodingParams::synthesis(),
        }
    }
}

/// Knowledge corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Categorized Q/A corpus
    pub corpus_path: PathBuf,
    /// Persisted index snapshot
    pub index_path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            corpus_path: PathBuf::from("data").join("chat_suggestion_res.txt"),
            index_path: data_dir.join("knowledge_index.json"),
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Candidates fetched before category filtering
    pub initial_k: usize,
    /// Candidates rendered into the LLM context
    pub context_top_n: usize,
    /// Maximum cached (query, k) entries
    pub cache_capacity: usize,
    /// Blocking search workers (default: CPU count, max 4)
    pub search_workers: Option<usize>,
}

impl RetrievalConfig {
    pub fn worker_count(&self) -> usize {
        self.search_workers
            .unwrap_or_else(|| num_cpus::get().min(4))
            .max(1)
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            initial_k: 15,
            context_top_n: 5,
            cache_capacity: 1000,
            search_workers: None,
        }
    }
}

/// External match service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Endpoint receiving `find_matches` requests
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Case-insensitive prefix that marks a filter request
    pub filter_marker: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080/cupid-again/php/match_api.php".to_string(),
            timeout_secs: 10,
            filter_marker: "filter".to_string(),
        }
    }
}

/// Feedback log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// JSON array of feedback records
    pub path: PathBuf,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("feedback.json"),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cupid-rag")
}
