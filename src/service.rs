//! Engine-facing service operations.
//!
//! The operations the HTTP collaborator calls, framework-agnostic: plain
//! serializable payloads in, plain payloads out. Each operation fetches one
//! catalog snapshot up front and computes purely over it; a store fetch
//! failure would propagate from the store itself, never a partial result.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogStore, ProductFilter};
use crate::engine::{Build, CompatEngine, MatchMode, MatchedAttribute, SelectionBuild};
use crate::types::{Product, ProductSummary};

/// Failures surfaced to the transport layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("No products selected")]
    EmptySelection,
}

/// Why a compatibility result is empty without any scan having run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchReason {
    /// The product has no attributes to match on. A terminal state, not an
    /// error.
    NoAttributes,
}

/// One compatible product plus the attributes that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibleProduct {
    #[serde(flatten)]
    pub product: ProductSummary,
    pub matched_on: Vec<MatchedAttribute>,
}

/// Compatibility report for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityReport {
    pub product: ProductSummary,
    pub compatible_products: Vec<CompatibleProduct>,
    pub total_compatible: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<NoMatchReason>,
}

/// A catalog product with its compatibility flag relative to some target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedProduct {
    #[serde(flatten)]
    pub product: ProductSummary,
    pub is_compatible: bool,
}

/// One entry of the catalog-wide compatibility view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
    pub product: ProductSummary,
    pub compatible_with: Vec<CompatibleProduct>,
}

/// Catalog-wide many-to-many compatibility view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCompatibility {
    pub total_products: usize,
    /// Products whose scan found at least one match.
    pub products_with_matches: usize,
    pub entries: Vec<CompatibilityEntry>,
}

/// Full-catalog build assembly result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildsReport {
    pub total_builds: usize,
    pub builds: Vec<Build>,
}

/// Builds anchored on one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionBuildsReport {
    pub selection: ProductSummary,
    pub total_builds: usize,
    pub builds: Vec<SelectionBuild>,
}

/// Sequential-narrowing result: the resolved selections and what still fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrowReport {
    pub selections: Vec<ProductSummary>,
    pub candidates: Vec<ProductSummary>,
}

/// Service facade over a catalog store and the compatibility engine.
#[derive(Debug)]
pub struct CatalogService<S: CatalogStore> {
    store: S,
    engine: CompatEngine,
}

impl<S: CatalogStore> CatalogService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            engine: CompatEngine::new(),
        }
    }

    pub fn with_engine(store: S, engine: CompatEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &CompatEngine {
        &self.engine
    }

    fn require_product(&self, id: &str) -> Result<Product, ServiceError> {
        self.store
            .find_product(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    fn others(&self, id: &str) -> Vec<Product> {
        self.store
            .find_products(&ProductFilter::all().exclude([id.to_string()]))
    }

    /// Compatible products for one target, under an explicit mode.
    pub fn compatibility_for(
        &self,
        id: &str,
        mode: MatchMode,
    ) -> Result<CompatibilityReport, ServiceError> {
        let product = self.require_product(id)?;

        if product.attributes.is_empty() {
            return Ok(CompatibilityReport {
                product: product.summary(),
                compatible_products: Vec::new(),
                total_compatible: 0,
                reason: Some(NoMatchReason::NoAttributes),
            });
        }

        let candidates = self.others(id);
        let compatible_products: Vec<CompatibleProduct> = self
            .engine
            .scan(&product, &candidates, mode)
            .into_iter()
            .map(|m| {
                let summary = candidates
                    .iter()
                    .find(|c| c.id == m.product_b)
                    .map(Product::summary)
                    .expect("scan result references a candidate");
                CompatibleProduct {
                    product: summary,
                    matched_on: m.matched_on,
                }
            })
            .collect();

        Ok(CompatibilityReport {
            total_compatible: compatible_products.len(),
            product: product.summary(),
            compatible_products,
            reason: None,
        })
    }

    /// Every other catalog product, flagged compatible or not.
    pub fn flagged_products(
        &self,
        id: &str,
        mode: MatchMode,
    ) -> Result<Vec<FlaggedProduct>, ServiceError> {
        let product = self.require_product(id)?;
        let candidates = self.others(id);

        Ok(candidates
            .iter()
            .map(|candidate| FlaggedProduct {
                product: candidate.summary(),
                is_compatible: self.engine.pairwise(&product, candidate, mode).compatible,
            })
            .collect())
    }

    /// Many-to-many view across the whole catalog.
    pub fn catalog_compatibility(&self, mode: MatchMode) -> CatalogCompatibility {
        let catalog = self.store.find_products(&ProductFilter::all());
        let scanned = self.engine.scan_all(&catalog, mode);

        let entries: Vec<CompatibilityEntry> = scanned
            .iter()
            .filter(|(_, matches)| !matches.is_empty())
            .map(|(id, matches)| {
                let product = catalog
                    .iter()
                    .find(|p| &p.id == id)
                    .expect("scan_all key comes from the catalog");
                CompatibilityEntry {
                    product: product.summary(),
                    compatible_with: matches
                        .iter()
                        .map(|m| CompatibleProduct {
                            product: catalog
                                .iter()
                                .find(|p| p.id == m.product_b)
                                .map(Product::summary)
                                .expect("match references a catalog product"),
                            matched_on: m.matched_on.clone(),
                        })
                        .collect(),
                }
            })
            .collect();

        CatalogCompatibility {
            total_products: catalog.len(),
            products_with_matches: entries.len(),
            entries,
        }
    }

    /// Complete builds over the whole catalog.
    pub fn builds(&self) -> BuildsReport {
        let catalog = self.store.find_products(&ProductFilter::all());
        let builds = self.engine.assemble_builds(&catalog);
        BuildsReport {
            total_builds: builds.len(),
            builds,
        }
    }

    /// Builds anchored on one selected product.
    pub fn builds_for(&self, id: &str) -> Result<SelectionBuildsReport, ServiceError> {
        let product = self.require_product(id)?;
        let catalog = self.others(id);
        let builds = self.engine.builds_for_selection(&product, &catalog);
        Ok(SelectionBuildsReport {
            selection: product.summary(),
            total_builds: builds.len(),
            builds,
        })
    }

    /// Sequential narrowing over the given selection ids. Unknown ids are
    /// skipped; the resolved selections come back so callers can detect it.
    pub fn narrow(&self, selected_ids: &[String]) -> Result<NarrowReport, ServiceError> {
        if selected_ids.is_empty() {
            return Err(ServiceError::EmptySelection);
        }

        let selections: Vec<Product> = selected_ids
            .iter()
            .filter_map(|id| self.store.find_product(id))
            .collect();
        let remaining = self
            .store
            .find_products(&ProductFilter::all().exclude(selected_ids.iter().cloned()));

        let candidates = self.engine.narrow_sequential(&selections, &remaining);

        Ok(NarrowReport {
            selections: selections.iter().map(Product::summary).collect(),
            candidates: candidates.iter().map(Product::summary).collect(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
