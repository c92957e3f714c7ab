//! Shared filter-clause helpers used by every per-entity query builder in
//! [`crate::queries`]. All values reach SQL through `push_bind` — never
//! string interpolation.

use sqlx::{Postgres, QueryBuilder};

/// Push ` WHERE ` before the first clause, ` AND ` before every subsequent
/// one.
fn push_conjunction(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    if *first {
        qb.push(" WHERE ");
        *first = false;
    } else {
        qb.push(" AND ");
    }
}

/// Exact match on a single column, given an already-resolved lookup id.
/// Skipped entirely if `id` is `None` (unrecognized enum value or absent
/// attribute).
pub fn exact_eq(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, column: &str, id: Option<i32>) {
    if let Some(id) = id {
        push_conjunction(qb, first);
        qb.push(column).push(" = ").push_bind(id);
    }
}

/// Exact match OR'd across several columns: entities with split attributes
/// like `standard_1`/`standard_2` match on either.
pub fn exact_eq_any(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, columns: &[&str], id: Option<i32>) {
    let Some(id) = id else { return };
    push_conjunction(qb, first);
    qb.push("(");
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(column).push(" = ").push_bind(id);
    }
    qb.push(")");
}

/// Boolean filter, applied only when `raw` is `Some(_)`; `None` means the
/// attribute wasn't present at all and the filter is skipped, matching the
/// duck-typed `hasattr` check it replaces.
pub fn boolean_eq(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, column: &str, raw: Option<bool>) {
    if let Some(value) = raw {
        push_conjunction(qb, first);
        qb.push(column).push(" = ").push_bind(value);
    }
}

/// Numeric equality filter, e.g. the `Dy` attribute.
pub fn numeric_eq(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, column: &str, value: Option<i32>) {
    if let Some(value) = value {
        push_conjunction(qb, first);
        qb.push(column).push(" = ").push_bind(value);
    }
}

/// Text search: tokenize on whitespace, OR substring matches across the
/// given columns per token, AND the per-token groups.
pub fn text_search(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, columns: &[&str], original_query: &str) {
    if columns.is_empty() {
        return;
    }
    apply_text_search_tokens(qb, first, columns, original_query);
}

fn apply_text_search_tokens(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool, columns: &[&str], original_query: &str) {
    for token in original_query.split_whitespace() {
        if token.is_empty() {
            continue;
        }
        push_conjunction(qb, first);
        let pattern = format!("%{token}%");
        qb.push("(");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(column).push(" ILIKE ").push_bind(pattern.clone());
        }
        qb.push(")");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_eq_is_skipped_when_lookup_misses() {
        let mut qb = QueryBuilder::new("SELECT 1");
        let mut first = true;
        exact_eq(&mut qb, &mut first, "standard_id", None);
        assert_eq!(qb.sql(), "SELECT 1");
        assert!(first);
    }

    #[test]
    fn first_clause_gets_where_later_clauses_get_and() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM fittings t");
        let mut first = true;
        exact_eq(&mut qb, &mut first, "standard_id", Some(4));
        exact_eq(&mut qb, &mut first, "thread_id", Some(2));
        assert_eq!(qb.sql(), "SELECT 1 FROM fittings t WHERE standard_id = $1 AND thread_id = $2");
    }

    #[test]
    fn exact_eq_any_ors_across_columns() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM adapters t");
        let mut first = true;
        exact_eq_any(&mut qb, &mut first, &["standard_1_id", "standard_2_id"], Some(4));
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM adapters t WHERE (standard_1_id = $1 OR standard_2_id = $2)"
        );
    }

    #[test]
    fn text_search_ands_token_groups_and_ors_columns_within_a_token() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM fittings t");
        let mut first = true;
        text_search(&mut qb, &mut first, &["article", "name"], "dkol 12");
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM fittings t WHERE (article ILIKE $1 OR name ILIKE $2) AND (article ILIKE $3 OR name ILIKE $4)"
        );
    }

    #[test]
    fn text_search_with_no_columns_is_a_no_op() {
        let mut qb = QueryBuilder::new("SELECT 1 FROM adapter_tee t");
        let mut first = true;
        text_search(&mut qb, &mut first, &[], "dkol");
        assert_eq!(qb.sql(), "SELECT 1 FROM adapter_tee t");
        assert!(first);
    }
}
