//! LLM-backed extraction of age bounds and location from filter requests

pub mod locations;
pub mod slots;

pub use locations::{normalize_location, CANONICAL_LOCATIONS};
pub use slots::{extraction_prompt, parse_slots, EXTRACTION_PERSONA};

use std::sync::Arc;
use std::time::Instant;

use crate::config::DecodingParams;
use crate::error::Error;
use crate::providers::LlmProvider;
use crate::types::ExtractedSlots;

/// Turns a free-text filter request into [`ExtractedSlots`]
///
/// Every failure (model unreachable, timeout, unparseable reply) collapses to
/// empty slots so the caller can fall through to the normal answer flow.
pub struct SlotExtractor {
    llm: Arc<dyn LlmProvider>,
    params: DecodingParams,
}

impl SlotExtractor {
    pub fn new(llm: Arc<dyn LlmProvider>, params: DecodingParams) -> Self {
        Self { llm, params }
    }

    pub async fn extract(&self, question: &str) -> ExtractedSlots {
        let start = Instant::now();
        let prompt = extraction_prompt(question);

        let reply = tokio::time::timeout(
            self.params.timeout(),
            self.llm.complete(EXTRACTION_PERSONA, &prompt, &self.params),
        )
        .await
        .unwrap_or_else(|_| {
            Err(Error::Timeout {
                operation: "slot extraction",
                secs: self.params.timeout_secs,
            })
        });

        let slots = match reply.and_then(|raw| {
            tracing::debug!("Raw extraction reply: {}", raw);
            parse_slots(&raw)
        }) {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!("Slot extraction failed, treating all slots as empty: {}", e);
                ExtractedSlots::default()
            }
        };

        tracing::info!(
            "Extracted minAge={:?} maxAge={:?} location={:?} in {}ms",
            slots.min_age,
            slots.max_age,
            slots.location,
            start.elapsed().as_millis()
        );

        slots
    }
}
