//! Compatibility rule set.
//!
//! One static table, keyed by unordered category pair, declared once. The
//! motherboard is the hub: every rule pairs it with one other slot category.
//! No direct rule exists between two non-motherboard categories — their
//! compatibility is only ever established transitively through a shared
//! compatible motherboard.

use crate::attrs::Concept;
use crate::types::Slot;

/// How the two sides of a rule are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Both sides resolve the concept and the normalized values must be equal.
    Exact(Concept),
    /// Inclusive-or over several concepts: the first pair that is present on
    /// both sides and equal satisfies the rule. Deliberately loose — a
    /// compatibility signal, not strict validation.
    AnyOf(&'static [Concept]),
    /// Numeric threshold on the wattage concept: the supplying side (PSU) must
    /// be greater than or equal to the consuming side. Values are digit-
    /// stripped before parsing; an unparseable side makes the rule false.
    WattageAtLeast,
}

/// A declared rule between two slot categories. Pair order is not meaningful;
/// lookups match either orientation.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pair: (Slot, Slot),
    pub comparison: Comparison,
}

impl Rule {
    pub fn new(a: Slot, b: Slot, comparison: Comparison) -> Self {
        Self {
            pair: (a, b),
            comparison,
        }
    }

    /// True when this rule covers the given (unordered) category pair.
    pub fn covers(&self, a: &Slot, b: &Slot) -> bool {
        (self.pair.0 == *a && self.pair.1 == *b) || (self.pair.0 == *b && self.pair.1 == *a)
    }
}

/// The declared rule table.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

const RAM_CONCEPTS: &[Concept] = &[Concept::RamType, Concept::RamCapacity, Concept::RamSpeed];

impl RuleSet {
    /// An empty rule set; every pair is unknown.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard motherboard-hub rules.
    pub fn standard() -> Self {
        let mb = Slot::Motherboard;
        Self {
            rules: vec![
                Rule::new(mb.clone(), Slot::Cpu, Comparison::Exact(Concept::Socket)),
                Rule::new(mb.clone(), Slot::Ram, Comparison::AnyOf(RAM_CONCEPTS)),
                Rule::new(
                    mb.clone(),
                    Slot::Gpu,
                    Comparison::Exact(Concept::PcieInterface),
                ),
                Rule::new(mb.clone(), Slot::Psu, Comparison::WattageAtLeast),
                Rule::new(mb, Slot::Storage, Comparison::Exact(Concept::StorageType)),
            ],
        }
    }

    /// Register an additional rule.
    pub fn register(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Find the rule for an unordered category pair. `None` means unknown
    /// pair — the matcher reports not-compatible, never an error.
    pub fn rule_for(&self, a: &Slot, b: &Slot) -> Option<&Rule> {
        self.rules.iter().find(|r| r.covers(a, b))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
