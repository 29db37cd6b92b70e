//! Deterministic in-process providers for pipeline and HTTP tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use cupid_rag::config::{DecodingParams, RagConfig};
use cupid_rag::error::{Error, Result};
use cupid_rag::extraction::EXTRACTION_PERSONA;
use cupid_rag::providers::{EmbeddingProvider, LlmProvider, MatchGateway, MatchedUser};
use cupid_rag::server::state::AppState;
use cupid_rag::types::{ExtractedSlots, UserId};

pub const CORPUS: &str = "\
[Bắt đầu cuộc trò chuyện]

Q: Nên nhắn gì đầu tiên khi mới ghép đôi?
A: Hỏi về một sở thích trong hồ sơ của họ.

Q: Làm quen thế nào cho tự nhiên?
A: Khen một chi tiết cụ thể rồi đặt câu hỏi mở.

[Giao tiếp & Hẹn hò]

Q: Họ trả lời tin nhắn chậm thì sao?
A: Đừng nhắn dồn dập, chờ 1-2 ngày rồi nhắn lại nhẹ nhàng.

Q: Rủ đi hẹn hò ở đâu thì thú vị?
A: Một quán cà phê yên tĩnh hoặc triển lãm nhỏ.

[Kết thúc hoặc tiếp tục mối quan hệ]

Q: Khi nào nên nói chuyện nghiêm túc về mối quan hệ?
A: Khi cả hai đã gặp nhau vài lần và thấy thoải mái.
";

pub const SAFETY_CORPUS: &str = "\
[Bảo mật & An toàn khi hẹn hò]

Q: Có nên cho số điện thoại sớm không?
A: Chỉ chia sẻ khi bạn đã tin tưởng họ.
";

/// Bag-of-words embedder hashing tokens onto a fixed number of axes
pub struct HashEmbedder {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl HashEmbedder {
    pub const DIMENSIONS: usize = 64;

    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::embedding("embedder offline"));
        }

        let mut vector = vec![0.0; Self::DIMENSIONS];
        vector[0] = 0.01;
        for token in text
            .to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let hash = token
                .bytes()
                .fold(2166136261u32, |h, b| (h ^ b as u32).wrapping_mul(16777619));
            vector[hash as usize % Self::DIMENSIONS] += 1.0;
        }
        Ok(vector)
    }

    fn model(&self) -> &str {
        "hash-bow"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "hash"
    }
}

/// LLM double answering by persona and recording every prompt
pub struct ScriptedLlm {
    pub extraction_reply: Mutex<Option<String>>,
    pub synthesis_reply: Mutex<Option<String>>,
    pub prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            extraction_reply: Mutex::new(Some(
                r#"{"minAge": null, "maxAge": null, "location": null}"#.to_string(),
            )),
            synthesis_reply: Mutex::new(Some("Hãy kiên nhẫn và nhắn lại nhẹ nhàng.".to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_extraction(&self, reply: Option<&str>) {
        *self.extraction_reply.lock() = reply.map(str::to_string);
    }

    pub fn reply_synthesis(&self, reply: Option<&str>) {
        *self.synthesis_reply.lock() = reply.map(str::to_string);
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, system: &str, prompt: &str, _params: &DecodingParams) -> Result<String> {
        self.prompts.lock().push((system.to_string(), prompt.to_string()));
        let reply = if system == EXTRACTION_PERSONA {
            self.extraction_reply.lock().clone()
        } else {
            self.synthesis_reply.lock().clone()
        };
        reply.ok_or_else(|| Error::llm("model unavailable"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// What the recording gateway does when called
#[derive(Clone)]
pub enum GatewayBehavior {
    Users(usize),
    Status(u16),
    Unreachable,
}

pub struct RecordingGateway {
    pub behavior: Mutex<GatewayBehavior>,
    pub calls: Mutex<Vec<(ExtractedSlots, Option<UserId>)>>,
}

impl RecordingGateway {
    pub fn new(behavior: GatewayBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(ExtractedSlots, Option<UserId>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MatchGateway for RecordingGateway {
    async fn find_matches(
        &self,
        criteria: &ExtractedSlots,
        user_id: Option<&UserId>,
    ) -> Result<Vec<MatchedUser>> {
        self.calls.lock().push((criteria.clone(), user_id.cloned()));
        match self.behavior.lock().clone() {
            GatewayBehavior::Users(n) => Ok((0..n)
                .map(|i| serde_json::json!({ "id": i, "name": format!("user{}", i) }))
                .collect()),
            GatewayBehavior::Status(code) => Err(Error::MatchStatus(code)),
            GatewayBehavior::Unreachable => Err(Error::MatchService("connection refused".to_string())),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

pub struct Harness {
    pub state: AppState,
    pub embedder: Arc<HashEmbedder>,
    pub llm: Arc<ScriptedLlm>,
    pub gateway: Arc<RecordingGateway>,
    pub dir: tempfile::TempDir,
}

pub fn test_config(dir: &Path, corpus: &str) -> RagConfig {
    let corpus_path = dir.join("corpus.txt");
    std::fs::write(&corpus_path, corpus).unwrap();

    let mut config = RagConfig::default();
    config.knowledge.corpus_path = corpus_path;
    config.knowledge.index_path = dir.join("index.json");
    config.feedback.path = dir.join("feedback.json");
    config.retrieval.search_workers = Some(2);
    config
}

pub async fn harness_with(corpus: &str) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path(), corpus);

    let embedder = Arc::new(HashEmbedder::new());
    let llm = Arc::new(ScriptedLlm::new());
    let gateway = Arc::new(RecordingGateway::new(GatewayBehavior::Users(2)));

    let state = AppState::with_providers(
        config,
        embedder.clone(),
        llm.clone(),
        gateway.clone(),
    )
    .await
    .unwrap();

    Harness {
        state,
        embedder,
        llm,
        gateway,
        dir,
    }
}

pub async fn harness() -> Harness {
    harness_with(CORPUS).await
}
