//! LLMGateway : four idempotent operations over the oracle.
//! The gateway itself never caches; callers cache at the TaskStore layer
//! using [`hydrofind_shared::fingerprint`].

use hydrofind_shared::{ComponentType, ExtractedData, HydroError};

use crate::oracle::OracleClient;
use crate::prompts;

pub struct LlmGateway {
    oracle: OracleClient,
}

impl LlmGateway {
    pub fn new(oracle: OracleClient) -> Self {
        Self { oracle }
    }

    /// Classify a raw query into the component-type closed set, or `None`
    /// ("unknown") if the oracle is empty or its answer doesn't fall in the
    /// set even after the case-insensitive substring fallback.
    pub async fn classify(&self, query: &str) -> Result<Option<ComponentType>, HydroError> {
        let answer = self.oracle.complete(prompts::CLASSIFICATION_PROMPT, query).await?;
        let Some(answer) = answer else {
            return Ok(None);
        };
        let cleaned = answer.trim().trim_matches(|c| c == '"' || c == '\'');
        Ok(ComponentType::parse_exact(cleaned).or_else(|| ComponentType::parse_fuzzy(cleaned)))
    }

    /// Extract the typed parameter record for `component_type`. `Ok(None)`
    /// means the oracle returned empty content (`extraction_empty`, a
    /// terminal-error condition the Worker maps onto, not an error here).
    pub async fn extract_params(
        &self,
        query: &str,
        component_type: ComponentType,
    ) -> Result<Option<ExtractedData>, HydroError> {
        let prompt = prompts::extraction_prompt(component_type);
        let answer = self.oracle.complete(prompt, query).await?;
        let Some(answer) = answer else {
            return Ok(None);
        };

        let trimmed = answer.trim();
        let looks_like_json = trimmed.starts_with('{') && trimmed.ends_with('}');
        let parsed_json = if looks_like_json {
            serde_json::from_str::<serde_json::Value>(trimmed).ok()
        } else {
            None
        };

        let extracted = match parsed_json {
            Some(value) => ExtractedData::from_component(component_type, value),
            None => ExtractedData::Raw(serde_json::json!({ "raw_response": trimmed })),
        };
        Ok(Some(extracted))
    }

    /// Extract a requested quantity, or `None` if the oracle reports "не
    /// указано" / empty content, or its answer contains no digit run at all.
    pub async fn extract_quantity(&self, query: &str) -> Result<Option<u32>, HydroError> {
        let answer = self.oracle.complete(prompts::QUANTITY_PROMPT, query).await?;
        let Some(answer) = answer else {
            return Ok(None);
        };
        let trimmed = answer.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("не указано") {
            return Ok(None);
        }
        Ok(longest_digit_run(trimmed))
    }

    /// Split multi-line text into trimmed, non-empty component lines. Falls
    /// back to treating the whole input as a single line when the oracle is
    /// empty.
    pub async fn split_batch(&self, text: &str) -> Result<Vec<String>, HydroError> {
        let answer = self.oracle.complete(prompts::SPLIT_BATCH_PROMPT, text).await?;
        let Some(answer) = answer else {
            return Ok(vec![text.trim().to_string()]);
        };
        let lines: Vec<String> = answer
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            Ok(vec![text.trim().to_string()])
        } else {
            Ok(lines)
        }
    }
}

/// The longest contiguous run of ASCII digits in `s`, parsed as `u32`. Ties
/// are broken by position (the earlier run wins) — this is the "longest
/// leading digit run" quantity-extraction rule.
fn longest_digit_run(s: &str) -> Option<u32> {
    let mut best: Option<(usize, usize)> = None;
    let mut current_start: Option<usize> = None;

    let mut record = |start: usize, end: usize, best: &mut Option<(usize, usize)>| {
        let len = end - start;
        if best.map_or(true, |(_, best_len)| len > best_len) {
            *best = Some((start, len));
        }
    };

    for (i, c) in s.char_indices() {
        if c.is_ascii_digit() {
            current_start.get_or_insert(i);
        } else if let Some(start) = current_start.take() {
            record(start, i, &mut best);
        }
    }
    if let Some(start) = current_start {
        record(start, s.len(), &mut best);
    }

    best.and_then(|(start, len)| s[start..start + len].parse::<u32>().ok())
}
