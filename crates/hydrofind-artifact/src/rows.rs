//! Column schema and row projection for tabular artifacts.

use hydrofind_shared::{BatchResult, CatalogMatch, SingleResult, TaskResult};

/// `(header, width)` in column order, carried as metadata for a future
/// binary-spreadsheet renderer: the byte format is an out-of-scope external
/// collaborator, but the column layout is not.
pub const COLUMNS: [(&str, usize); 4] = [("Query", 40), ("Name", 50), ("Article", 20), ("Quantity", 10)];

const NOT_FOUND: &str = "not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRow {
    pub query: String,
    pub name: String,
    pub article: String,
    pub quantity: String,
}

impl ArtifactRow {
    fn not_found(query: impl Into<String>) -> Self {
        Self { query: query.into(), name: NOT_FOUND.into(), article: String::new(), quantity: String::new() }
    }

    fn matched(query: &str, quantity: &str, m: &CatalogMatch) -> Self {
        Self { query: query.into(), name: m.name.clone(), article: m.article.clone(), quantity: quantity.into() }
    }
}

fn single_rows(query: &str, quantity: Option<u32>, matches: &[CatalogMatch]) -> Vec<ArtifactRow> {
    if matches.is_empty() {
        return vec![ArtifactRow::not_found(query)];
    }
    let quantity = quantity.unwrap_or(1).to_string();
    matches.iter().map(|m| ArtifactRow::matched(query, &quantity, m)).collect()
}

fn batch_rows(result: &SingleResult) -> Vec<ArtifactRow> {
    single_rows(&result.query, result.quantity, &result.matches)
}

/// Project a `TaskResult` into artifact rows : one row per
/// match per sub-query for `batch` (quantity inherited from the sub-query),
/// one row per match for `single` (task-level quantity, default 1). A
/// sub-query with no matches, or no result at all (its oracle/catalog stage
/// failed), still produces one "not found" row so every input line is
/// represented in the output.
pub fn build_rows(result: &TaskResult) -> Vec<ArtifactRow> {
    match result {
        TaskResult::Single(single) => single_rows(&single.query, single.quantity, &single.matches),
        TaskResult::Batch(BatchResult { results, .. }) => results
            .iter()
            .flat_map(|item| match &item.result {
                Some(single) => batch_rows(single),
                None => vec![ArtifactRow::not_found(item.line.clone())],
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydrofind_shared::{AiResultSummary, BatchItemResult, ComponentType, ResultSource};

    fn summary() -> AiResultSummary {
        AiResultSummary { component_type: Some(ComponentType::Fittings), extracted_data: serde_json::json!({}) }
    }

    fn catalog_match(article: &str, name: &str) -> CatalogMatch {
        CatalogMatch { article: article.into(), name: name.into(), extra: Default::default() }
    }

    #[test]
    fn single_with_no_matches_emits_one_not_found_row() {
        let result = TaskResult::Single(SingleResult {
            query: "dkol 12".into(),
            source: ResultSource::Database,
            matches: vec![],
            match_count: 0,
            ai_result: summary(),
            quantity: Some(3),
            timestamp: 0,
        });
        let rows = build_rows(&result);
        assert_eq!(rows, vec![ArtifactRow::not_found("dkol 12")]);
    }

    #[test]
    fn single_inherits_task_level_quantity_across_every_match_row() {
        let result = TaskResult::Single(SingleResult {
            query: "dkol 12".into(),
            source: ResultSource::Database,
            matches: vec![catalog_match("A1", "Fitting A"), catalog_match("A2", "Fitting B")],
            match_count: 2,
            ai_result: summary(),
            quantity: Some(5),
            timestamp: 0,
        });
        let rows = build_rows(&result);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.quantity == "5" && r.query == "dkol 12"));
        assert_eq!(rows[0].article, "A1");
        assert_eq!(rows[1].article, "A2");
    }

    #[test]
    fn single_defaults_missing_quantity_to_one() {
        let result = TaskResult::Single(SingleResult {
            query: "dkol 12".into(),
            source: ResultSource::Database,
            matches: vec![catalog_match("A1", "Fitting A")],
            match_count: 1,
            ai_result: summary(),
            quantity: None,
            timestamp: 0,
        });
        assert_eq!(build_rows(&result)[0].quantity, "1");
    }

    #[test]
    fn batch_uses_each_sub_query_quantity_and_skips_failed_lines_as_not_found() {
        let ok_item = BatchItemResult {
            line: "dkol 12 x3".into(),
            result: Some(SingleResult {
                query: "dkol 12".into(),
                source: ResultSource::Cache,
                matches: vec![catalog_match("A1", "Fitting A")],
                match_count: 1,
                ai_result: summary(),
                quantity: Some(3),
                timestamp: 0,
            }),
            error: None,
        };
        let failed_item = BatchItemResult { line: "garbled line".into(), result: None, error: Some("oracle timeout".into()) };
        let result = TaskResult::Batch(BatchResult {
            results: vec![ok_item, failed_item],
            total_items: 2,
            processed_items: 2,
            timestamp: 0,
        });
        let rows = build_rows(&result);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].quantity, "3");
        assert_eq!(rows[1], ArtifactRow::not_found("garbled line"));
    }
}
