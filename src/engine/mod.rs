//! Attribute-based compatibility engine.
//!
//! A pure function of the product catalog: no mutation, no I/O past the
//! caller-provided snapshot. Three capabilities:
//! - pairwise compatibility between two products
//! - catalog-wide compatibility scans (one-to-many and many-to-many)
//! - multi-slot build assembly and incremental selection narrowing
//!
//! Re-invoking any operation on an unchanged snapshot yields identical
//! output.

mod assembler;
mod matcher;
mod rules;
mod scanner;

pub use assembler::{Build, SelectionBuild};
pub use matcher::{MatchMode, MatchOutcome, MatchResult, MatchedAttribute};
pub use rules::{Comparison, Rule, RuleSet};

use indexmap::IndexMap;

use crate::types::{Product, ProductId};

/// Compatibility engine: the declared rule set plus the operations over it.
#[derive(Debug, Clone, Default)]
pub struct CompatEngine {
    rules: RuleSet,
}

impl CompatEngine {
    /// Engine with the standard motherboard-hub rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom rule set.
    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Pairwise check under an explicit mode.
    pub fn pairwise(&self, a: &Product, b: &Product, mode: MatchMode) -> MatchOutcome {
        matcher::evaluate(&self.rules, a, b, mode)
    }

    /// One target against a candidate list; all matches, catalog order.
    pub fn scan(&self, target: &Product, candidates: &[Product], mode: MatchMode) -> Vec<MatchResult> {
        scanner::scan(&self.rules, target, candidates, mode)
    }

    /// Every attribute-bearing product against the rest of the catalog.
    pub fn scan_all(
        &self,
        catalog: &[Product],
        mode: MatchMode,
    ) -> IndexMap<ProductId, Vec<MatchResult>> {
        scanner::scan_all(&self.rules, catalog, mode)
    }

    /// Complete builds: one per motherboard with all required slots covered.
    pub fn assemble_builds(&self, catalog: &[Product]) -> Vec<Build> {
        assembler::assemble_builds(&self.rules, catalog)
    }

    /// Builds anchored on one selected product.
    pub fn builds_for_selection(&self, selection: &Product, catalog: &[Product]) -> Vec<SelectionBuild> {
        assembler::builds_for_selection(&self.rules, selection, catalog)
    }

    /// Incremental narrowing over the remaining catalog.
    pub fn narrow_sequential(&self, selections: &[Product], remaining: &[Product]) -> Vec<Product> {
        assembler::narrow_sequential(&self.rules, selections, remaining)
    }
}
