//! The single-query pipeline: CACHE_PROBE → CLASSIFY → EXTRACT_PARAMS →
//! EXTRACT_QTY → CATALOG. Shared by the Worker's `single` message handling
//! and, per sub-query, its `batch` handling — the state machine is
//! per-query, not per-message.

use chrono::Utc;
use hydrofind_catalog::CatalogAdapter;
use hydrofind_llm::LlmGateway;
use hydrofind_shared::{AiResultSummary, HydroError, ResultSource, SingleResult};
use hydrofind_store::TaskStoreClient;

/// What a successful run of the single-query pipeline produced.
pub enum SingleOutcome {
    /// CACHE_PROBE hit; `source` is forced to `Cache` regardless of how the
    /// payload was originally produced.
    Cache(SingleResult),
    /// Ran the full pipeline to a terminal result (`source` is `Database` for
    /// `matches>0`, `AiOnly` for the partial-results fallback).
    Resolved(SingleResult),
}

impl SingleOutcome {
    pub fn into_result(self) -> SingleResult {
        match self {
            SingleOutcome::Cache(r) => r,
            SingleOutcome::Resolved(r) => r,
        }
    }
}

/// A stage failure, tagged by whether the Worker's retry policy applies:
/// only network/timeout/connection failures are transient; validation,
/// unknown-type, and extraction-empty are terminal.
pub enum StageFailure {
    Retryable(HydroError),
    Terminal(HydroError),
}

impl StageFailure {
    pub fn into_error(self) -> HydroError {
        match self {
            StageFailure::Retryable(e) => e,
            StageFailure::Terminal(e) => e,
        }
    }
}

pub(crate) fn classify_oracle_error(e: HydroError) -> StageFailure {
    if e.is_transient() {
        StageFailure::Retryable(e)
    } else {
        StageFailure::Terminal(e)
    }
}

/// TaskStore calls made *within* the pipeline (CACHE_PROBE, the search-cache
/// write after a catalog hit) are not the PERSIST commit — a failure here is
/// a store timeout, not a write-at-commit failure, so it's `transient_upstream`
/// and goes through the counted retry/backoff path rather than nack-requeue.
/// This is what distinguishes a task-store timeout from a `persistence_failure`.
fn classify_store_error(e: HydroError) -> StageFailure {
    match e {
        HydroError::Redis(msg) => StageFailure::Retryable(HydroError::transient_upstream(msg)),
        other => StageFailure::Terminal(other),
    }
}

pub struct SinglePipeline<'a> {
    pub llm: &'a LlmGateway,
    pub catalog: &'a CatalogAdapter,
    pub store: &'a (dyn TaskStoreClient + 'a),
    pub partial_results_enabled: bool,
}

impl<'a> SinglePipeline<'a> {
    pub async fn run(&self, query: &str) -> Result<SingleOutcome, StageFailure> {
        let trimmed = query.trim();
        let fingerprint = hydrofind_shared::fingerprint::fingerprint(trimmed);

        if let Some(mut cached) = self.store.get_search_cache(&fingerprint).await.map_err(classify_store_error)? {
            cached.source = ResultSource::Cache;
            return Ok(SingleOutcome::Cache(cached));
        }

        let component_type =
            self.llm.classify(trimmed).await.map_err(classify_oracle_error)?.ok_or(StageFailure::Terminal(HydroError::ClassificationUnknown))?;

        let extracted = self
            .llm
            .extract_params(trimmed, component_type)
            .await
            .map_err(classify_oracle_error)?
            .ok_or(StageFailure::Terminal(HydroError::ExtractionEmpty))?;

        // EXTRACT_QTY: failures are absorbed; quantity is optional.
        let quantity = self.llm.extract_quantity(trimmed).await.unwrap_or(None);

        let ai_result = AiResultSummary { component_type: Some(component_type), extracted_data: extracted.as_json() };
        let timestamp = Utc::now().timestamp();

        let catalog_outcome = self.catalog.search(component_type, &extracted, trimmed).await;
        match catalog_outcome {
            Ok(matches) if !matches.is_empty() => {
                let match_count = matches.len();
                let result = SingleResult {
                    query: trimmed.to_string(),
                    source: ResultSource::Database,
                    matches,
                    match_count,
                    ai_result,
                    quantity,
                    timestamp,
                };
                self.store.put_search_cache(&fingerprint, &result).await.map_err(classify_store_error)?;
                Ok(SingleOutcome::Resolved(result))
            }
            Ok(_empty) => self.ai_only_or_error(trimmed, ai_result, quantity, timestamp, HydroError::CatalogFailure("no catalog matches".into())),
            Err(e) if e.is_transient() => Err(StageFailure::Retryable(e)),
            Err(e) => self.ai_only_or_error(trimmed, ai_result, quantity, timestamp, e),
        }
    }

    /// CATALOG stage failure policy: partial result with the LLM output
    /// preserved when partial-results are enabled, else terminal error.
    /// Partial results are never cached — a cache hit always means a
    /// completed result, never a partial one.
    fn ai_only_or_error(
        &self,
        query: &str,
        ai_result: AiResultSummary,
        quantity: Option<u32>,
        timestamp: i64,
        error: HydroError,
    ) -> Result<SingleOutcome, StageFailure> {
        if self.partial_results_enabled {
            Ok(SingleOutcome::Resolved(SingleResult {
                query: query.to_string(),
                source: ResultSource::AiOnly,
                matches: Vec::new(),
                match_count: 0,
                ai_result,
                quantity,
                timestamp,
            }))
        } else {
            Err(StageFailure::Terminal(error))
        }
    }
}
