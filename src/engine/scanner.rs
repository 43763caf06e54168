//! Catalog compatibility scanner.
//!
//! Applies the pairwise matcher across the catalog. No ranking, no limit, no
//! short-circuiting beyond skipping products with empty attribute maps (they
//! can never match under any mode). Result order is the caller's iteration
//! order; ties are not broken.

use indexmap::IndexMap;

use crate::engine::matcher::{self, MatchMode, MatchResult};
use crate::engine::rules::RuleSet;
use crate::types::{Product, ProductId};

/// Match one target against a candidate list. The target itself is skipped if
/// present among the candidates.
pub fn scan(
    rules: &RuleSet,
    target: &Product,
    candidates: &[Product],
    mode: MatchMode,
) -> Vec<MatchResult> {
    if target.attributes.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for candidate in candidates {
        if candidate.id == target.id || candidate.attributes.is_empty() {
            continue;
        }
        let outcome = matcher::evaluate(rules, target, candidate, mode);
        if outcome.compatible {
            results.push(MatchResult {
                product_a: target.id.clone(),
                product_b: candidate.id.clone(),
                matched_on: outcome.matched,
            });
        }
    }
    results
}

/// Match every attribute-bearing product against the rest of the catalog.
///
/// O(n²) over catalog size. Products with empty attribute maps are excluded
/// from the result entirely; products whose scan finds nothing keep an entry
/// with an empty list. Iteration order of the returned map is catalog order.
pub fn scan_all(
    rules: &RuleSet,
    catalog: &[Product],
    mode: MatchMode,
) -> IndexMap<ProductId, Vec<MatchResult>> {
    let mut results = IndexMap::new();
    for product in catalog {
        if product.attributes.is_empty() {
            continue;
        }
        results.insert(product.id.clone(), scan(rules, product, catalog, mode));
    }
    results
}
