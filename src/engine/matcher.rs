//! Pairwise compatibility matcher.
//!
//! Two named strategies, selected explicitly by the caller:
//!
//! - [`MatchMode::RuleBased`] applies the declared category-pair rule set.
//! - [`MatchMode::GenericOverlap`] is the legacy rule-free fallback: any key
//!   present in both attribute maps with case-insensitively equal values.
//!
//! The two modes produce different result sets for the same inputs; they are
//! kept as distinct strategies rather than collapsed.

use serde::{Deserialize, Serialize};

use crate::attrs::{Concept, normalize_value, parse_watts};
use crate::engine::rules::{Comparison, RuleSet};
use crate::types::{Product, ProductId, Slot};

/// Matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Declared per-category-pair rules (motherboard hub model).
    RuleBased,
    /// Any shared attribute key with equal values, rule-free.
    GenericOverlap,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::RuleBased => write!(f, "rule-based"),
            MatchMode::GenericOverlap => write!(f, "generic-overlap"),
        }
    }
}

/// One attribute pair that satisfied the match. `key` is the concept's
/// canonical spelling in rule-based mode and the target's stored key in
/// generic-overlap mode; `value` is always the normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedAttribute {
    pub key: String,
    pub value: String,
}

impl MatchedAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result of one pairwise evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub compatible: bool,
    pub matched: Vec<MatchedAttribute>,
}

impl MatchOutcome {
    pub fn no_match() -> Self {
        Self {
            compatible: false,
            matched: Vec::new(),
        }
    }

    pub fn matched_on(matched: Vec<MatchedAttribute>) -> Self {
        Self {
            compatible: true,
            matched,
        }
    }
}

/// A confirmed match between two products, as consumed by the scanner and
/// assembler. Ephemeral; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub product_a: ProductId,
    pub product_b: ProductId,
    pub matched_on: Vec<MatchedAttribute>,
}

/// Evaluate one pair of products under the given mode.
///
/// Rule-based mode returns not-compatible for an unknown category pair; a
/// product with an empty attribute map can never match under either mode.
pub fn evaluate(rules: &RuleSet, a: &Product, b: &Product, mode: MatchMode) -> MatchOutcome {
    if a.attributes.is_empty() || b.attributes.is_empty() {
        return MatchOutcome::no_match();
    }
    match mode {
        MatchMode::RuleBased => evaluate_rule_based(rules, a, b),
        MatchMode::GenericOverlap => evaluate_generic_overlap(a, b),
    }
}

fn evaluate_rule_based(rules: &RuleSet, a: &Product, b: &Product) -> MatchOutcome {
    let rule = match rules.rule_for(&a.slot(), &b.slot()) {
        Some(rule) => rule,
        None => return MatchOutcome::no_match(),
    };

    match rule.comparison {
        Comparison::Exact(concept) => match_exact(a, b, concept),
        Comparison::AnyOf(concepts) => {
            for &concept in concepts {
                let outcome = match_exact(a, b, concept);
                if outcome.compatible {
                    return outcome;
                }
            }
            MatchOutcome::no_match()
        }
        Comparison::WattageAtLeast => match_wattage(a, b),
    }
}

fn match_exact(a: &Product, b: &Product, concept: Concept) -> MatchOutcome {
    match (a.attributes.concept(concept), b.attributes.concept(concept)) {
        (Some(left), Some(right)) if left == right => {
            MatchOutcome::matched_on(vec![MatchedAttribute::new(concept.primary_key(), left)])
        }
        _ => MatchOutcome::no_match(),
    }
}

/// Wattage threshold: the PSU side supplies, the other side consumes. Either
/// side failing to parse makes the rule false, regardless of magnitude.
fn match_wattage(a: &Product, b: &Product) -> MatchOutcome {
    let (supplier, consumer) = if a.slot() == Slot::Psu {
        (a, b)
    } else {
        (b, a)
    };

    let supplier_raw = match supplier.attributes.concept(Concept::Wattage) {
        Some(v) => v,
        None => return MatchOutcome::no_match(),
    };
    let consumer_raw = match consumer.attributes.concept(Concept::Wattage) {
        Some(v) => v,
        None => return MatchOutcome::no_match(),
    };

    match (parse_watts(&supplier_raw), parse_watts(&consumer_raw)) {
        (Some(supplied), Some(required)) if supplied >= required => MatchOutcome::matched_on(vec![
            MatchedAttribute::new(Concept::Wattage.primary_key(), supplier_raw),
        ]),
        _ => MatchOutcome::no_match(),
    }
}

/// Legacy any-overlap strategy: a key present in both maps (exact spelling)
/// whose values are equal after normalization. Every overlapping pair is
/// reported, in the target's attribute order.
fn evaluate_generic_overlap(a: &Product, b: &Product) -> MatchOutcome {
    let mut matched = Vec::new();
    for (key, value) in a.attributes.iter() {
        if let Some(other) = b.attributes.get_exact(key) {
            let left = normalize_value(value);
            if !left.is_empty() && left == normalize_value(other) {
                matched.push(MatchedAttribute::new(key, left));
            }
        }
    }
    if matched.is_empty() {
        MatchOutcome::no_match()
    } else {
        MatchOutcome::matched_on(matched)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
