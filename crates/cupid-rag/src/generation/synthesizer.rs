//! Answer pipeline: routing, filter matching, retrieval and synthesis

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{DecodingParams, RagConfig};
use crate::error::{Error, Result};
use crate::extraction::SlotExtractor;
use crate::providers::{LlmProvider, MatchGateway};
use crate::retrieval::SemanticSearch;
use crate::routing::{is_filter_request, quick_response, Category, CategoryClassifier};
use crate::types::{AnswerResponse, ExtractedSlots, QuestionRequest, SearchHit, UserId};

use super::prompt::{PromptBuilder, INSUFFICIENT_INFO, SYNTHESIS_PERSONA};

pub const EMPTY_QUESTION: &str = "Câu hỏi không được để trống.";
pub const NO_RELATED_DOCUMENTS: &str = "Không tìm thấy tài liệu nào liên quan trong cơ sở dữ liệu.";
pub const NO_SUITABLE_DOCUMENTS: &str = "Không tìm thấy tài liệu phù hợp để xử lý.";
pub const NO_MATCHING_USERS: &str = "Không tìm thấy người dùng phù hợp với độ tuổi này.";
pub const MATCH_DATA_UNAVAILABLE: &str = "Không thể lấy dữ liệu người dùng từ hệ thống.";
pub const MATCH_SERVICE_ERROR: &str = "Lỗi khi gọi hệ thống tìm kiếm.";

/// Tunables for one pipeline instance
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Candidates fetched before category filtering
    pub initial_k: usize,
    /// Candidates rendered into the prompt
    pub context_top_n: usize,
    /// Prefix that marks a filter request
    pub filter_marker: String,
    /// Decoding profile for the synthesis call
    pub synthesis: DecodingParams,
    /// Upper bound on one match service call
    pub match_timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &RagConfig) -> Self {
        Self {
            initial_k: config.retrieval.initial_k,
            context_top_n: config.retrieval.context_top_n,
            filter_marker: config.matching.filter_marker.clone(),
            synthesis: config.llm.synthesis.clone(),
            match_timeout: Duration::from_secs(config.matching.timeout_secs),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&RagConfig::default())
    }
}

/// Orchestrates one answer per question
///
/// Steps run in a fixed order and the first one that produces a reply ends
/// the request. No step surfaces an error to the caller; every failure maps
/// to a user-facing message.
pub struct AnswerSynthesizer {
    search: Arc<SemanticSearch>,
    extractor: SlotExtractor,
    gateway: Arc<dyn MatchGateway>,
    llm: Arc<dyn LlmProvider>,
    settings: PipelineSettings,
}

impl AnswerSynthesizer {
    pub fn new(
        search: Arc<SemanticSearch>,
        extractor: SlotExtractor,
        gateway: Arc<dyn MatchGateway>,
        llm: Arc<dyn LlmProvider>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            search,
            extractor,
            gateway,
            llm,
            settings,
        }
    }

    pub fn search(&self) -> &SemanticSearch {
        &self.search
    }

    pub async fn answer(&self, request: &QuestionRequest) -> AnswerResponse {
        let start = Instant::now();
        let question = request.question.as_str();

        if question.trim().is_empty() {
            tracing::warn!("Rejected empty question");
            return AnswerResponse::rejected(EMPTY_QUESTION);
        }

        tracing::info!("Question from user {:?}: \"{}\"", request.user_id, question);

        let response = self.route(question, request.user_id.as_ref()).await;

        tracing::info!(
            "Answered {:?} in {}ms (exact: {}, sources: {:?})",
            response.answer_id,
            start.elapsed().as_millis(),
            response.is_exact,
            response.sources
        );

        response
    }

    async fn route(&self, question: &str, user_id: Option<&UserId>) -> AnswerResponse {
        if is_filter_request(question, &self.settings.filter_marker) {
            let slots = self.extractor.extract(question).await;
            if !slots.is_empty() {
                return self.answer_with_matches(slots, user_id).await;
            }
            tracing::debug!("Filter request without usable criteria, continuing");
        }

        if let Some(reply) = quick_response(question) {
            tracing::debug!("Matched quick response");
            return AnswerResponse::new(reply);
        }

        let Some(category) = CategoryClassifier::classify(question) else {
            tracing::debug!("No category, returning default reply");
            return AnswerResponse::new(INSUFFICIENT_INFO);
        };

        self.answer_from_knowledge(question, category).await
    }

    async fn answer_with_matches(
        &self,
        slots: ExtractedSlots,
        user_id: Option<&UserId>,
    ) -> AnswerResponse {
        let start = Instant::now();
        let result = tokio::time::timeout(
            self.settings.match_timeout,
            self.gateway.find_matches(&slots, user_id),
        )
        .await
        .unwrap_or_else(|_| {
            Err(Error::Timeout {
                operation: "match service",
                secs: self.settings.match_timeout.as_secs(),
            })
        });

        tracing::debug!(
            "Match service ({}) took {}ms",
            self.gateway.name(),
            start.elapsed().as_millis()
        );

        match result {
            Ok(users) if users.is_empty() => AnswerResponse::new(NO_MATCHING_USERS),
            Ok(users) => {
                tracing::info!("Match service returned {} users", users.len());
                AnswerResponse::from_matches(match_summary(users.len(), &slots), slots)
            }
            Err(Error::MatchStatus(status)) => {
                tracing::warn!("Match service answered HTTP {}", status);
                AnswerResponse::new(MATCH_DATA_UNAVAILABLE)
            }
            Err(e) => {
                tracing::warn!("Match service call failed: {}", e);
                AnswerResponse::new(MATCH_SERVICE_ERROR)
            }
        }
    }

    async fn answer_from_knowledge(&self, question: &str, category: Category) -> AnswerResponse {
        let start = Instant::now();
        let initial = self
            .search
            .similarity_search(question, self.settings.initial_k)
            .await;

        tracing::debug!(
            "Retrieved {} candidates in {}ms",
            initial.len(),
            start.elapsed().as_millis()
        );

        if initial.is_empty() {
            return AnswerResponse::new(NO_RELATED_DOCUMENTS);
        }

        let candidates = filter_candidates(&initial, category);
        if candidates.is_empty() {
            tracing::debug!("No valid candidates after filtering");
            return AnswerResponse::new(NO_SUITABLE_DOCUMENTS);
        }

        let context = PromptBuilder::build_context(&candidates, self.settings.context_top_n);
        tracing::debug!("Context for synthesis:\n{}", context);

        match self.synthesize(question, &context).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() || PromptBuilder::is_insufficient(text) {
                    AnswerResponse::from_retrieval(INSUFFICIENT_INFO)
                } else {
                    AnswerResponse::from_retrieval(text)
                }
            }
            Err(e) => {
                tracing::warn!("Synthesis failed, returning default reply: {}", e);
                AnswerResponse::from_retrieval(INSUFFICIENT_INFO)
            }
        }
    }

    async fn synthesize(&self, question: &str, context: &str) -> Result<String> {
        let start = Instant::now();
        let prompt = PromptBuilder::build_rag_prompt(question, context);
        let params = &self.settings.synthesis;

        let text = tokio::time::timeout(
            params.timeout(),
            self.llm.complete(SYNTHESIS_PERSONA, &prompt, params),
        )
        .await
        .map_err(|_| Error::Timeout {
            operation: "answer synthesis",
            secs: params.timeout_secs,
        })??;

        tracing::debug!(
            "Synthesis with {} took {}ms",
            self.llm.model(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Keep candidates in the predicted category, falling back to every complete
/// candidate when the category has none
fn filter_candidates(hits: &[SearchHit], category: Category) -> Vec<&SearchHit> {
    let in_category: Vec<&SearchHit> = hits
        .iter()
        .filter(|hit| category.matches(&hit.document.category) && hit.document.is_complete())
        .collect();

    if !in_category.is_empty() {
        tracing::debug!("{} candidates in category '{}'", in_category.len(), category);
        return in_category;
    }

    let complete: Vec<&SearchHit> = hits.iter().filter(|hit| hit.document.is_complete()).collect();
    tracing::debug!(
        "No candidates in category '{}', falling back to {} retrieved",
        category,
        complete.len()
    );
    complete
}

/// Sentence summarizing a match result by the criteria actually given
pub fn match_summary(count: usize, slots: &ExtractedSlots) -> String {
    let mut summary = format!("Có {} người ", count);

    let has_age = match (slots.min_age, slots.max_age) {
        (Some(min), Some(max)) => {
            summary.push_str(&format!("trong độ tuổi từ {} đến {}", min, max));
            true
        }
        (Some(min), None) => {
            summary.push_str(&format!("trên {} tuổi", min));
            true
        }
        (None, Some(max)) => {
            summary.push_str(&format!("dưới {} tuổi", max));
            true
        }
        (None, None) => false,
    };

    if let Some(location) = &slots.location {
        if has_age {
            summary.push_str(" và ");
        }
        summary.push_str(&format!("sống ở {}", location));
    }

    summary.push_str(". Đang tải danh sách...");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::EXTRACTION_PERSONA;
    use crate::providers::{EmbeddingProvider, MatchedUser};
    use crate::retrieval::KnowledgeIndex;
    use crate::types::{Document, RETRIEVAL_SOURCE};
    use async_trait::async_trait;

    const STALL: Duration = Duration::from_secs(600);

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn model(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Answers extraction at once; synthesis stalls
    struct StallingLlm;

    #[async_trait]
    impl LlmProvider for StallingLlm {
        async fn complete(&self, system: &str, _prompt: &str, _params: &DecodingParams) -> Result<String> {
            if system == EXTRACTION_PERSONA {
                return Ok(r#"{"minAge": 18, "maxAge": null, "location": null}"#.to_string());
            }
            tokio::time::sleep(STALL).await;
            Ok("quá muộn".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stalling"
        }

        fn model(&self) -> &str {
            "stalling"
        }
    }

    struct StallingGateway;

    #[async_trait]
    impl MatchGateway for StallingGateway {
        async fn find_matches(
            &self,
            _criteria: &ExtractedSlots,
            _user_id: Option<&UserId>,
        ) -> Result<Vec<MatchedUser>> {
            tokio::time::sleep(STALL).await;
            Ok(vec![serde_json::json!({ "id": 1 })])
        }

        fn name(&self) -> &str {
            "stalling"
        }
    }

    fn stalling_synthesizer() -> AnswerSynthesizer {
        let index = KnowledgeIndex::new(
            vec![Document::new(
                "Rủ đi hẹn hò ở đâu?",
                "Quán cà phê yên tĩnh.",
                Category::CommunicationDating.label(),
            )],
            vec![vec![1.0, 0.0]],
            "fixed",
        )
        .unwrap();
        let search = SemanticSearch::new(Arc::new(index), Arc::new(FixedEmbedder), 10, 1);
        let llm: Arc<dyn LlmProvider> = Arc::new(StallingLlm);
        let settings = PipelineSettings {
            synthesis: DecodingParams {
                timeout_secs: 2,
                ..DecodingParams::synthesis()
            },
            match_timeout: Duration::from_secs(3),
            ..PipelineSettings::default()
        };

        AnswerSynthesizer::new(
            Arc::new(search),
            SlotExtractor::new(Arc::clone(&llm), DecodingParams::extraction()),
            Arc::new(StallingGateway),
            llm,
            settings,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_synthesis_falls_back_to_sentinel() {
        let synthesizer = stalling_synthesizer();
        let start = tokio::time::Instant::now();

        let response = synthesizer
            .answer(&QuestionRequest::new("Rủ đi hẹn hò ở đâu?"))
            .await;

        assert_eq!(response.answer, INSUFFICIENT_INFO);
        assert_eq!(response.sources, vec![RETRIEVAL_SOURCE.to_string()]);
        assert!(response.answer_id.is_some());
        assert!(start.elapsed() < STALL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_match_service_reports_error() {
        let synthesizer = stalling_synthesizer();
        let start = tokio::time::Instant::now();

        let response = synthesizer
            .answer(&QuestionRequest::new("filter trên 18 tuổi"))
            .await;

        assert_eq!(response.answer, MATCH_SERVICE_ERROR);
        assert!(!response.is_exact);
        assert!(response.filter.is_none());
        assert!(start.elapsed() < STALL);
    }

    fn slots(min: Option<i64>, max: Option<i64>, loc: Option<&str>) -> ExtractedSlots {
        ExtractedSlots {
            min_age: min,
            max_age: max,
            location: loc.map(str::to_string),
        }
    }

    #[test]
    fn test_match_summary_variants() {
        assert_eq!(
            match_summary(3, &slots(Some(18), Some(25), Some("Hà Nội"))),
            "Có 3 người trong độ tuổi từ 18 đến 25 và sống ở Hà Nội. Đang tải danh sách..."
        );
        assert_eq!(
            match_summary(1, &slots(Some(18), None, None)),
            "Có 1 người trên 18 tuổi. Đang tải danh sách..."
        );
        assert_eq!(
            match_summary(2, &slots(None, Some(30), None)),
            "Có 2 người dưới 30 tuổi. Đang tải danh sách..."
        );
        assert_eq!(
            match_summary(4, &slots(None, None, Some("Đà Nẵng"))),
            "Có 4 người sống ở Đà Nẵng. Đang tải danh sách..."
        );
    }

    fn hit(q: &str, a: &str, category: &str) -> SearchHit {
        SearchHit {
            document: Arc::new(Document::new(q, a, category)),
            score: 0.9,
        }
    }

    #[test]
    fn test_filter_prefers_category() {
        let hits = vec![
            hit("q0", "a0", "Giao tiếp & Hẹn hò"),
            hit("q1", "a1", Category::MeetingSafety.label()),
            hit("q2", "", Category::MeetingSafety.label()),
            hit("q3", "a3", Category::MeetingSafety.label()),
        ];
        let filtered = filter_candidates(&hits, Category::MeetingSafety);
        let questions: Vec<_> = filtered.iter().map(|h| h.document.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q3"]);
    }

    #[test]
    fn test_filter_falls_back_to_all_complete() {
        let hits = vec![
            hit("q0", "a0", "Giao tiếp & Hẹn hò"),
            hit("q1", " ", "Giao tiếp & Hẹn hò"),
            hit("q2", "a2", "unknown"),
        ];
        let filtered = filter_candidates(&hits, Category::MeetingSafety);
        let questions: Vec<_> = filtered.iter().map(|h| h.document.question.as_str()).collect();
        assert_eq!(questions, vec!["q0", "q2"]);

        let incomplete = vec![hit("", "a", "x"), hit("q", "", "y")];
        assert!(filter_candidates(&incomplete, Category::MeetingSafety).is_empty());
    }
}
