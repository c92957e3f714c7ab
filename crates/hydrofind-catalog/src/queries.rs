//! One compile-time query builder per component type, replacing the
//! original service's `hasattr(self.model, ...)` duck typing with a `match`
//! over the closed set. Table and column names follow
//! `backend/data/models/components.py`.

use hydrofind_shared::{CatalogMatch, ExtractedData};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::filters;
use crate::lookup;

#[derive(sqlx::FromRow)]
struct CatalogRow {
    article: String,
    name: String,
    extra: serde_json::Value,
}

impl From<CatalogRow> for CatalogMatch {
    fn from(row: CatalogRow) -> Self {
        let extra = match row.extra {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        CatalogMatch { article: row.article, name: row.name, extra }
    }
}

fn select(table: &str) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT article, name, to_jsonb(t) - 'article' - 'name' AS extra FROM ");
    qb.push(table.to_string());
    qb.push(" t");
    qb
}

/// Shared terminal step: push the limit clause, execute, and map rows.
async fn run(pool: &PgPool, mut qb: QueryBuilder<'_, Postgres>, limit: i64) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    qb.push(" LIMIT ").push_bind(limit);
    let rows: Vec<CatalogRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(CatalogMatch::from).collect())
}

pub async fn fittings(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::FittingData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("fittings");
    let mut first = true;

    if let Some(data) = data {
        filters::exact_eq(&mut qb, &mut first, "standard_id", data.standard.as_deref().and_then(lookup::standard_id));
        filters::exact_eq(&mut qb, &mut first, "thread_id", data.thread.as_deref().and_then(lookup::thread_id));
        filters::exact_eq(&mut qb, &mut first, "armature_id", data.armature.map(|a| a.as_str()).and_then(lookup::armature_id));
        filters::exact_eq(&mut qb, &mut first, "angle", data.angle.and_then(lookup::angle_value));
        filters::exact_eq(&mut qb, &mut first, "seria_id", data.seria.as_deref().and_then(lookup::series_id));
        filters::boolean_eq(&mut qb, &mut first, "usit", data.usit);
        filters::boolean_eq(&mut qb, &mut first, "o_ring", data.o_ring);
        filters::numeric_eq(&mut qb, &mut first, "\"Dy\"", data.dy);
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn adapters(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::AdapterData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("adapters");
    let mut first = true;

    if let Some(data) = data {
        let standard_id = data
            .standard_1
            .as_deref()
            .and_then(lookup::standard_id)
            .or_else(|| data.standard_2.as_deref().and_then(lookup::standard_id));
        filters::exact_eq_any(&mut qb, &mut first, &["standard_1_id", "standard_2_id"], standard_id);

        let thread_id = data
            .thread_1
            .as_deref()
            .and_then(lookup::thread_id)
            .or_else(|| data.thread_2.as_deref().and_then(lookup::thread_id));
        filters::exact_eq_any(&mut qb, &mut first, &["thread_1_id", "thread_2_id"], thread_id);

        let armature_id = data
            .armature_1
            .map(|a| a.as_str())
            .and_then(lookup::armature_id)
            .or_else(|| data.armature_2.map(|a| a.as_str()).and_then(lookup::armature_id));
        filters::exact_eq_any(&mut qb, &mut first, &["armature_1_id", "armature_2_id"], armature_id);

        filters::exact_eq(&mut qb, &mut first, "angle", data.angle.and_then(lookup::angle_value));
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn plugs(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::PlugData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("plugs");
    let mut first = true;

    if let Some(data) = data {
        filters::exact_eq(&mut qb, &mut first, "standard_id", data.standard.as_deref().and_then(lookup::standard_id));
        filters::exact_eq(&mut qb, &mut first, "thread_id", data.thread.as_deref().and_then(lookup::thread_id));
        filters::exact_eq(&mut qb, &mut first, "armature_id", data.armature.map(|a| a.as_str()).and_then(lookup::armature_id));
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn adapter_tee(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::AdapterTeeData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("adapter_tee");
    let mut first = true;

    if let Some(data) = data {
        let standard_id = [&data.standard_1, &data.standard_2, &data.standard_3]
            .into_iter()
            .find_map(|s| s.as_deref().and_then(lookup::standard_id));
        filters::exact_eq_any(&mut qb, &mut first, &["standard_1_id", "standard_2_id", "standard_3_id"], standard_id);

        let thread_id = [&data.thread_1, &data.thread_2, &data.thread_3]
            .into_iter()
            .find_map(|s| s.as_deref().and_then(lookup::thread_id));
        filters::exact_eq_any(&mut qb, &mut first, &["thread_1_id", "thread_2_id", "thread_3_id"], thread_id);

        let armature_id = [data.armature_1, data.armature_2, data.armature_3]
            .into_iter()
            .find_map(|a| a.map(|a| a.as_str()).and_then(lookup::armature_id));
        filters::exact_eq_any(&mut qb, &mut first, &["armature_1_id", "armature_2_id", "armature_3_id"], armature_id);
    }

    // No s_key on adapter-tee (hydrofind_shared::extracted::AdapterTeeData).
    filters::text_search(&mut qb, &mut first, &["article", "name"], original_query);
    run(pool, qb, limit).await
}

pub async fn banjo(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::BanjoData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("banjo");
    let mut first = true;

    if let Some(data) = data {
        filters::exact_eq(&mut qb, &mut first, "standard_id", data.standard.as_deref().and_then(lookup::standard_id));
        filters::exact_eq(&mut qb, &mut first, "thread_id", data.thread.as_deref().and_then(lookup::thread_id));
        filters::exact_eq(&mut qb, &mut first, "angle", data.angle.and_then(lookup::angle_value));
        filters::numeric_eq(&mut qb, &mut first, "\"Dy\"", data.dy);
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn banjo_bolt(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::BanjoBoltData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("banjo_bolt");
    let mut first = true;

    if let Some(data) = data {
        filters::exact_eq(&mut qb, &mut first, "standard_id", data.standard.as_deref().and_then(lookup::standard_id));
        filters::exact_eq(&mut qb, &mut first, "thread_id", data.thread.as_deref().and_then(lookup::thread_id));
        filters::numeric_eq(&mut qb, &mut first, "length", data.length);
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn brs(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::BrsData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("brs");
    let mut first = true;

    if let Some(data) = data {
        filters::exact_eq(&mut qb, &mut first, "standard_id", data.standard.as_deref().and_then(lookup::standard_id));
        filters::exact_eq(&mut qb, &mut first, "thread_id", data.thread.as_deref().and_then(lookup::thread_id));
        filters::numeric_eq(&mut qb, &mut first, "\"Dy\"", data.dy);
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

pub async fn coupling(
    pool: &PgPool,
    data: Option<&hydrofind_shared::extracted::CouplingData>,
    original_query: &str,
    limit: i64,
) -> Result<Vec<CatalogMatch>, sqlx::Error> {
    let mut qb = select("coupling");
    let mut first = true;

    if let Some(data) = data {
        let standard_id = data
            .standard_1
            .as_deref()
            .and_then(lookup::standard_id)
            .or_else(|| data.standard_2.as_deref().and_then(lookup::standard_id));
        filters::exact_eq_any(&mut qb, &mut first, &["standard_1_id", "standard_2_id"], standard_id);

        let thread_id = data
            .thread_1
            .as_deref()
            .and_then(lookup::thread_id)
            .or_else(|| data.thread_2.as_deref().and_then(lookup::thread_id));
        filters::exact_eq_any(&mut qb, &mut first, &["thread_1_id", "thread_2_id"], thread_id);
    }

    filters::text_search(&mut qb, &mut first, &["article", "name", "s_key"], original_query);
    run(pool, qb, limit).await
}

/// Downcast the already-classified `ExtractedData` to the variant matching
/// `component_type`. Returns `None` for a mismatch (e.g. `Raw`/`RawText`
/// fallbacks) — the query still runs, with text search as its only filter.
pub fn as_fitting(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::FittingData> {
    match data {
        ExtractedData::Fitting(d) => Some(d),
        _ => None,
    }
}

pub fn as_adapter(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::AdapterData> {
    match data {
        ExtractedData::Adapter(d) => Some(d),
        _ => None,
    }
}

pub fn as_plug(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::PlugData> {
    match data {
        ExtractedData::Plug(d) => Some(d),
        _ => None,
    }
}

pub fn as_adapter_tee(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::AdapterTeeData> {
    match data {
        ExtractedData::AdapterTee(d) => Some(d),
        _ => None,
    }
}

pub fn as_banjo(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::BanjoData> {
    match data {
        ExtractedData::Banjo(d) => Some(d),
        _ => None,
    }
}

pub fn as_banjo_bolt(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::BanjoBoltData> {
    match data {
        ExtractedData::BanjoBolt(d) => Some(d),
        _ => None,
    }
}

pub fn as_brs(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::BrsData> {
    match data {
        ExtractedData::Brs(d) => Some(d),
        _ => None,
    }
}

pub fn as_coupling(data: &ExtractedData) -> Option<&hydrofind_shared::extracted::CouplingData> {
    match data {
        ExtractedData::Coupling(d) => Some(d),
        _ => None,
    }
}
