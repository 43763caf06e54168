//! Build assembler.
//!
//! Chains the scanner across slot categories to produce motherboard-centered
//! build bundles, and drives the incremental "given these selections, what
//! else fits" narrowing. Builds are ephemeral aggregates: constructed per
//! call, never stored.

use serde::{Deserialize, Serialize};

use crate::engine::matcher::{self, MatchMode};
use crate::engine::rules::RuleSet;
use crate::types::{Product, ProductSummary, Slot};

/// A complete build bundle: one motherboard plus every compatible candidate
/// for each required slot. Only emitted when all three required slots have at
/// least one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Build {
    pub motherboard: ProductSummary,
    pub cpus: Vec<ProductSummary>,
    pub rams: Vec<ProductSummary>,
    pub gpus: Vec<ProductSummary>,
}

/// Build bundle anchored on a user selection. When the selection is not a
/// motherboard there is one entry per compatible motherboard, carrying only
/// the slots the selection does not occupy (the selection's own slot list
/// stays empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionBuild {
    pub selection: ProductSummary,
    /// `None` when the selection itself is the motherboard.
    pub motherboard: Option<ProductSummary>,
    pub cpus: Vec<ProductSummary>,
    pub rams: Vec<ProductSummary>,
    pub gpus: Vec<ProductSummary>,
}

fn rule_compatible(rules: &RuleSet, a: &Product, b: &Product) -> bool {
    matcher::evaluate(rules, a, b, MatchMode::RuleBased).compatible
}

/// Candidates of one slot compatible with `anchor`, in catalog order.
fn compatible_in_slot(
    rules: &RuleSet,
    anchor: &Product,
    catalog: &[Product],
    slot: &Slot,
) -> Vec<ProductSummary> {
    catalog
        .iter()
        .filter(|p| p.id != anchor.id && p.slot() == *slot)
        .filter(|p| rule_compatible(rules, anchor, p))
        .map(ProductSummary::from)
        .collect()
}

/// One build per motherboard with at least one compatible CPU, RAM and GPU.
/// A motherboard with zero candidates in any required slot is dropped
/// entirely, never emitted with an empty slot.
pub fn assemble_builds(rules: &RuleSet, catalog: &[Product]) -> Vec<Build> {
    catalog
        .iter()
        .filter(|p| p.slot() == Slot::Motherboard)
        .filter_map(|mb| {
            let cpus = compatible_in_slot(rules, mb, catalog, &Slot::Cpu);
            let rams = compatible_in_slot(rules, mb, catalog, &Slot::Ram);
            let gpus = compatible_in_slot(rules, mb, catalog, &Slot::Gpu);
            if cpus.is_empty() || rams.is_empty() || gpus.is_empty() {
                return None;
            }
            Some(Build {
                motherboard: mb.summary(),
                cpus,
                rams,
                gpus,
            })
        })
        .collect()
}

/// Builds anchored on one selected product.
///
/// Motherboard selection: a single bundle over that board (emitted even when
/// some slots come back empty — the caller sees exactly what fits).
/// CPU/RAM/GPU selection: compatible motherboards are found first (reverse
/// rule direction), then each bundle carries the other two required slots.
/// Any other category has no hub rules to anchor on and yields no builds.
pub fn builds_for_selection(
    rules: &RuleSet,
    selection: &Product,
    catalog: &[Product],
) -> Vec<SelectionBuild> {
    let slot = selection.slot();

    if slot == Slot::Motherboard {
        return vec![SelectionBuild {
            selection: selection.summary(),
            motherboard: None,
            cpus: compatible_in_slot(rules, selection, catalog, &Slot::Cpu),
            rams: compatible_in_slot(rules, selection, catalog, &Slot::Ram),
            gpus: compatible_in_slot(rules, selection, catalog, &Slot::Gpu),
        }];
    }

    if !Slot::required_build_slots().contains(&slot) {
        return Vec::new();
    }

    catalog
        .iter()
        .filter(|p| p.id != selection.id && p.slot() == Slot::Motherboard)
        .filter(|mb| rule_compatible(rules, selection, mb))
        .map(|mb| SelectionBuild {
            selection: selection.summary(),
            motherboard: Some(mb.summary()),
            cpus: if slot != Slot::Cpu {
                compatible_in_slot(rules, mb, catalog, &Slot::Cpu)
            } else {
                Vec::new()
            },
            rams: if slot != Slot::Ram {
                compatible_in_slot(rules, mb, catalog, &Slot::Ram)
            } else {
                Vec::new()
            },
            gpus: if slot != Slot::Gpu {
                compatible_in_slot(rules, mb, catalog, &Slot::Gpu)
            } else {
                Vec::new()
            },
        })
        .collect()
}

/// Incremental narrowing over the remaining catalog, driven by which key
/// categories are already selected. Exactly four states:
///
/// - CPU and motherboard selected: only RAM/GPU candidates matching the
///   selected motherboard (PSU/Storage are not filtered in this state).
/// - Motherboard only: candidates across CPU/RAM/GPU/PSU/Storage matching
///   the board.
/// - CPU only: motherboards matching the CPU socket.
/// - Neither: the remaining catalog, unfiltered. RAM- or GPU-only selections
///   land here; they do not trigger narrowing.
pub fn narrow_sequential(
    rules: &RuleSet,
    selections: &[Product],
    remaining: &[Product],
) -> Vec<Product> {
    let selected_motherboard = selections.iter().find(|p| p.slot() == Slot::Motherboard);
    let selected_cpu = selections.iter().find(|p| p.slot() == Slot::Cpu);

    match (selected_cpu, selected_motherboard) {
        (Some(_), Some(mb)) => remaining
            .iter()
            .filter(|p| matches!(p.slot(), Slot::Ram | Slot::Gpu))
            .filter(|p| rule_compatible(rules, mb, p))
            .cloned()
            .collect(),
        (None, Some(mb)) => remaining
            .iter()
            .filter(|p| {
                matches!(
                    p.slot(),
                    Slot::Cpu | Slot::Ram | Slot::Gpu | Slot::Psu | Slot::Storage
                )
            })
            .filter(|p| rule_compatible(rules, mb, p))
            .cloned()
            .collect(),
        (Some(cpu), None) => remaining
            .iter()
            .filter(|p| p.slot() == Slot::Motherboard)
            .filter(|p| rule_compatible(rules, cpu, p))
            .cloned()
            .collect(),
        (None, None) => remaining.to_vec(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[path = "assembler_tests.rs"]
mod tests;
