//! CatalogAdapter: resolves a classified query into catalog rows through a
//! parameterized, per-entity query builder.

use hydrofind_shared::{CatalogMatch, ComponentType, ExtractedData, HydroError, HydroResult};
use sqlx::PgPool;

use crate::queries;

const DEFAULT_LIMIT: i64 = 10;

pub struct CatalogAdapter {
    pool: PgPool,
    limit: i64,
}

impl CatalogAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, limit: DEFAULT_LIMIT }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Run the catalog search for an already-classified component. Rejecting
    /// a component type outside the closed set is enforced by
    /// `ComponentType` being a closed enum — no value outside the set can
    /// reach this call.
    pub async fn search(
        &self,
        component_type: ComponentType,
        extracted_data: &ExtractedData,
        original_query: &str,
    ) -> HydroResult<Vec<CatalogMatch>> {
        let result = match component_type {
            ComponentType::Fittings => {
                queries::fittings(&self.pool, queries::as_fitting(extracted_data), original_query, self.limit).await
            }
            ComponentType::Adapters => {
                queries::adapters(&self.pool, queries::as_adapter(extracted_data), original_query, self.limit).await
            }
            ComponentType::Plugs => {
                queries::plugs(&self.pool, queries::as_plug(extracted_data), original_query, self.limit).await
            }
            ComponentType::AdapterTee => {
                queries::adapter_tee(&self.pool, queries::as_adapter_tee(extracted_data), original_query, self.limit)
                    .await
            }
            ComponentType::Banjo => {
                queries::banjo(&self.pool, queries::as_banjo(extracted_data), original_query, self.limit).await
            }
            ComponentType::BanjoBolt => {
                queries::banjo_bolt(&self.pool, queries::as_banjo_bolt(extracted_data), original_query, self.limit)
                    .await
            }
            ComponentType::Brs => {
                queries::brs(&self.pool, queries::as_brs(extracted_data), original_query, self.limit).await
            }
            ComponentType::Coupling => {
                queries::coupling(&self.pool, queries::as_coupling(extracted_data), original_query, self.limit).await
            }
        };

        result.map_err(|e| HydroError::catalog_failure(e.to_string()))
    }
}
