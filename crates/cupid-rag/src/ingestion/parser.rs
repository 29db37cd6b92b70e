//! Categorized Q/A corpus parser
//!
//! The corpus is plain text split into blocks by blank lines. A block that is
//! wrapped in brackets (`[Giao tiếp & Hẹn hò]`) switches the current category;
//! every other block is scanned for consecutive `Q:` / `A:` line pairs.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Document, UNKNOWN_CATEGORY};

/// Output of a corpus parse
#[derive(Debug, Clone, Default)]
pub struct ParsedCorpus {
    /// Documents in corpus order
    pub documents: Vec<Document>,
    /// Category labels in order of first appearance
    pub categories: Vec<String>,
    /// Lines that did not form a valid Q/A pair
    pub skipped_lines: usize,
}

/// Parser for the bracket-categorized Q/A format
pub struct CorpusParser;

impl CorpusParser {
    /// Read and parse a corpus file
    pub fn parse_file(path: &Path) -> Result<ParsedCorpus> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::index_unavailable(format!("Cannot read corpus {}: {}", path.display(), e))
        })?;
        Ok(Self::parse(&text))
    }

    /// Parse corpus text; malformed pairs are skipped, never fatal
    pub fn parse(text: &str) -> ParsedCorpus {
        let mut parsed = ParsedCorpus::default();
        let mut current_category = UNKNOWN_CATEGORY.to_string();

        for block in Self::blocks(text) {
            if let Some(category) = Self::category_marker(&block) {
                tracing::debug!("Found category: {}", category);
                if !parsed.categories.iter().any(|c| c == &category) {
                    parsed.categories.push(category.clone());
                }
                current_category = category;
                continue;
            }

            let mut i = 0;
            while i < block.len() {
                let pair = block
                    .get(i + 1)
                    .and_then(|next| Self::qa_pair(block[i], next));

                match pair {
                    Some((question, answer)) => {
                        if !question.is_empty() && !answer.is_empty() {
                            parsed
                                .documents
                                .push(Document::new(question, answer, current_category.clone()));
                        } else {
                            parsed.skipped_lines += 2;
                        }
                        i += 2;
                    }
                    None => {
                        parsed.skipped_lines += 1;
                        i += 1;
                    }
                }
            }
        }

        parsed
    }

    /// Group trimmed, non-empty lines into blank-line separated blocks
    fn blocks(text: &str) -> Vec<Vec<&str>> {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
    }

    /// `[label]` spanning the whole block
    fn category_marker(block: &[&str]) -> Option<String> {
        let first = block.first()?;
        let last = block.last()?;
        if !first.starts_with('[') || !last.ends_with(']') {
            return None;
        }
        let joined = block.join("\n");
        let inner = joined[1..joined.len() - 1].trim();
        Some(inner.to_string())
    }

    fn qa_pair<'a>(line: &'a str, next: &'a str) -> Option<(&'a str, &'a str)> {
        let question = line.strip_prefix("Q:")?;
        let answer = next.strip_prefix("A:")?;
        Some((question.trim(), answer.trim()))
    }
}
