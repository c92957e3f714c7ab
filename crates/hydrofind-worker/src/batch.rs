//! Batch fan-out: split a multi-line message into sub-queries (`split_batch`)
//! and run each through [`crate::single::SinglePipeline`] independently.

use chrono::Utc;
use hydrofind_shared::{BatchItemResult, BatchResult};

use crate::single::SinglePipeline;

/// Run every line of `text` through the single-query pipeline and aggregate
/// into a `BatchResult`. A sub-query's terminal failure (classify-unknown,
/// extraction-empty, catalog error with partials disabled) becomes a
/// `BatchItemResult.error` rather than aborting the whole batch — one bad
/// line never blocks the rest: `processed_items` counts every line
/// attempted.
pub async fn run_batch(pipeline: &SinglePipeline<'_>, lines: &[String]) -> BatchResult {
    let mut results = Vec::with_capacity(lines.len());
    for line in lines {
        let item = match pipeline.run(line).await {
            Ok(outcome) => BatchItemResult { line: line.clone(), result: Some(outcome.into_result()), error: None },
            Err(failure) => BatchItemResult { line: line.clone(), result: None, error: Some(failure.into_error().to_string()) },
        };
        results.push(item);
    }
    let total_items = results.len();
    BatchResult { processed_items: results.len(), results, total_items, timestamp: Utc::now().timestamp() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrofind_catalog::CatalogAdapter;
    use hydrofind_llm::{LlmGateway, OracleClient};
    use hydrofind_store::InMemoryTaskStore;
    use hydrofind_shared::{AiResultSummary, ResultSource, SingleResult};
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn cache_hits_are_counted_as_processed_and_preserve_quantity() {
        let store = InMemoryTaskStore::new(3600, 600, 86_400);
        for line in ["dkol 12", "dkol 13"] {
            let fingerprint = hydrofind_shared::fingerprint::fingerprint(line);
            let cached = SingleResult {
                query: line.to_string(),
                source: ResultSource::Database,
                matches: vec![],
                match_count: 0,
                ai_result: AiResultSummary { component_type: None, extracted_data: serde_json::json!({}) },
                quantity: Some(7),
                timestamp: 0,
            };
            store.put_search_cache(&fingerprint, &cached).await.unwrap();
        }

        let oracle = OracleClient::new("http://127.0.0.1:0".into(), "key".into(), "model".into(), 1, 1);
        let llm = LlmGateway::new(oracle);
        let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/nonexistent").unwrap();
        let catalog = CatalogAdapter::new(pool);
        let pipeline = SinglePipeline { llm: &llm, catalog: &catalog, store: &store, partial_results_enabled: true };

        let lines = vec!["dkol 12".to_string(), "dkol 13".to_string()];
        let batch = run_batch(&pipeline, &lines).await;

        assert_eq!(batch.total_items, 2);
        assert_eq!(batch.processed_items, 2);
        assert!(batch.results.iter().all(|r| r.error.is_none()));
        assert!(batch.results.iter().all(|r| r.result.as_ref().unwrap().quantity == Some(7)));
    }
}
