use super::*;
use proptest::prelude::*;

fn cpu(socket: &str) -> Product {
    Product::new("cpu-1", "Test CPU", "CPU").with_attribute("socketType", socket)
}

fn motherboard(socket: &str) -> Product {
    Product::new("mb-1", "Test Board", "Motherboard").with_attribute("socketType", socket)
}

// =========================================================================
// Rule-based mode
// =========================================================================

#[test]
fn test_socket_match() {
    let rules = RuleSet::standard();
    let outcome = evaluate(&rules, &motherboard("AM5"), &cpu("am5"), MatchMode::RuleBased);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched, vec![MatchedAttribute::new("socketType", "am5")]);
}

#[test]
fn test_socket_mismatch() {
    let rules = RuleSet::standard();
    let outcome = evaluate(
        &rules,
        &motherboard("AM5"),
        &cpu("LGA1700"),
        MatchMode::RuleBased,
    );
    assert!(!outcome.compatible);
    assert!(outcome.matched.is_empty());
}

#[test]
fn test_missing_attribute_is_unknown_not_incompatible() {
    let rules = RuleSet::standard();
    let bare_cpu = Product::new("cpu-2", "Bare CPU", "CPU").with_attribute("cores", "8");
    let outcome = evaluate(&rules, &motherboard("AM5"), &bare_cpu, MatchMode::RuleBased);
    assert!(!outcome.compatible);
}

#[test]
fn test_empty_attribute_map_never_matches() {
    let rules = RuleSet::standard();
    let empty = Product::new("cpu-3", "Empty", "CPU");
    let outcome = evaluate(&rules, &motherboard("AM5"), &empty, MatchMode::RuleBased);
    assert!(!outcome.compatible);
    let outcome = evaluate(&rules, &motherboard("AM5"), &empty, MatchMode::GenericOverlap);
    assert!(!outcome.compatible);
}

#[test]
fn test_unknown_category_pair() {
    let rules = RuleSet::standard();
    let ram = Product::new("ram-1", "RAM", "RAM").with_attribute("socketType", "am5");
    let outcome = evaluate(&rules, &cpu("am5"), &ram, MatchMode::RuleBased);
    assert!(!outcome.compatible);
}

#[test]
fn test_ram_rule_inclusive_or_on_speed_only() {
    let rules = RuleSet::standard();
    let mb = Product::new("mb-1", "Board", "Motherboard")
        .with_attribute("RamType", "DDR4")
        .with_attribute("RamSpeed", "3200MHz");
    let ram = Product::new("ram-1", "Stick", "RAM")
        .with_attribute("RamType", "DDR5")
        .with_attribute("RamSpeed", "3200mhz");

    // Types differ, speed agrees: still compatible
    let outcome = evaluate(&rules, &mb, &ram, MatchMode::RuleBased);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched, vec![MatchedAttribute::new("ramSpeed", "3200mhz")]);
}

#[test]
fn test_ram_rule_type_takes_priority() {
    let rules = RuleSet::standard();
    let mb = Product::new("mb-1", "Board", "Motherboard")
        .with_attribute("ramType", "ddr5")
        .with_attribute("RamSpeed", "6000");
    let ram = Product::new("ram-1", "Stick", "RAM")
        .with_attribute("memoryType", "DDR5")
        .with_attribute("RamSpeed", "6000");

    let outcome = evaluate(&rules, &mb, &ram, MatchMode::RuleBased);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched[0].key, "ramType");
}

#[test]
fn test_gpu_pcie_synonyms() {
    let rules = RuleSet::standard();
    let mb = Product::new("mb-1", "Board", "Motherboard").with_attribute("pcieVersion", "4.0");
    let gpu = Product::new("gpu-1", "Card", "GPU").with_attribute("pcieInterface", "4.0");
    let outcome = evaluate(&rules, &mb, &gpu, MatchMode::RuleBased);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched[0].key, "pcieInterface");
}

#[test]
fn test_storage_type_match() {
    let rules = RuleSet::standard();
    let mb = Product::new("mb-1", "Board", "Motherboard").with_attribute("Storagetype", "NVMe");
    let ssd = Product::new("sto-1", "Drive", "Storage").with_attribute("storageType", "nvme");
    let outcome = evaluate(&rules, &mb, &ssd, MatchMode::RuleBased);
    assert!(outcome.compatible);
}

// =========================================================================
// Wattage threshold
// =========================================================================

fn psu(wattage: &str) -> Product {
    Product::new("psu-1", "Test PSU", "PSU").with_attribute("wattage", wattage)
}

fn board_needing(wattage: &str) -> Product {
    Product::new("mb-w", "Hungry Board", "Motherboard").with_attribute("wattage", wattage)
}

#[test]
fn test_psu_covers_requirement() {
    let rules = RuleSet::standard();
    let outcome = evaluate(&rules, &board_needing("500W"), &psu("650W"), MatchMode::RuleBased);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched, vec![MatchedAttribute::new("wattage", "650w")]);
}

#[test]
fn test_psu_exact_boundary() {
    let rules = RuleSet::standard();
    let outcome = evaluate(&rules, &board_needing("650"), &psu("650"), MatchMode::RuleBased);
    assert!(outcome.compatible);
}

#[test]
fn test_psu_undersized() {
    let rules = RuleSet::standard();
    let outcome = evaluate(&rules, &board_needing("750W"), &psu("500W"), MatchMode::RuleBased);
    assert!(!outcome.compatible);
}

#[test]
fn test_psu_unparseable_is_false_not_error() {
    let rules = RuleSet::standard();
    // Unparseable on either side: rule is false regardless of magnitude
    let outcome = evaluate(&rules, &board_needing("unknown"), &psu("9999W"), MatchMode::RuleBased);
    assert!(!outcome.compatible);
    let outcome = evaluate(&rules, &board_needing("100W"), &psu("n/a"), MatchMode::RuleBased);
    assert!(!outcome.compatible);
}

#[test]
fn test_psu_direction_is_fixed() {
    // PSU supplies regardless of argument order
    let rules = RuleSet::standard();
    let a = evaluate(&rules, &psu("650W"), &board_needing("500W"), MatchMode::RuleBased);
    let b = evaluate(&rules, &board_needing("500W"), &psu("650W"), MatchMode::RuleBased);
    assert!(a.compatible);
    assert!(b.compatible);
}

// =========================================================================
// Generic overlap mode
// =========================================================================

#[test]
fn test_generic_overlap_case_insensitive_values() {
    let rules = RuleSet::standard();
    let a = Product::new("a", "A", "Accessory").with_attribute("color", "black");
    let b = Product::new("b", "B", "Accessory")
        .with_attribute("color", "Black")
        .with_attribute("size", "M");

    let outcome = evaluate(&rules, &a, &b, MatchMode::GenericOverlap);
    assert!(outcome.compatible);
    assert_eq!(outcome.matched, vec![MatchedAttribute::new("color", "black")]);
}

#[test]
fn test_generic_overlap_key_must_match_exactly() {
    let rules = RuleSet::standard();
    let a = Product::new("a", "A", "Accessory").with_attribute("Color", "black");
    let b = Product::new("b", "B", "Accessory").with_attribute("color", "black");
    let outcome = evaluate(&rules, &a, &b, MatchMode::GenericOverlap);
    assert!(!outcome.compatible);
}

#[test]
fn test_generic_overlap_ignores_rules() {
    let rules = RuleSet::standard();
    // CPU/RAM has no rule, but shares an attribute
    let cpu = Product::new("cpu-1", "CPU", "CPU").with_attribute("vendorCode", "x1");
    let ram = Product::new("ram-1", "RAM", "RAM").with_attribute("vendorCode", "X1");
    assert!(!evaluate(&rules, &cpu, &ram, MatchMode::RuleBased).compatible);
    assert!(evaluate(&rules, &cpu, &ram, MatchMode::GenericOverlap).compatible);
}

#[test]
fn test_generic_overlap_reports_all_shared_pairs() {
    let rules = RuleSet::standard();
    let a = Product::new("a", "A", "Accessory")
        .with_attribute("color", "black")
        .with_attribute("size", "m")
        .with_attribute("finish", "matte");
    let b = Product::new("b", "B", "Accessory")
        .with_attribute("color", "BLACK")
        .with_attribute("size", "M")
        .with_attribute("finish", "gloss");

    let outcome = evaluate(&rules, &a, &b, MatchMode::GenericOverlap);
    assert_eq!(outcome.matched.len(), 2);
}

// =========================================================================
// Properties
// =========================================================================

fn attr_value() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,8}"
}

proptest! {
    /// Rule-based matching is symmetric for every declared category pair.
    #[test]
    fn prop_rule_based_symmetry(socket_a in attr_value(), socket_b in attr_value()) {
        let rules = RuleSet::standard();
        let mb =
            Product::new("mb", "Board", "Motherboard").with_attribute("socketType", socket_a.as_str());
        let cpu = Product::new("cpu", "Chip", "CPU").with_attribute("socketType", socket_b.as_str());
        let forward = evaluate(&rules, &mb, &cpu, MatchMode::RuleBased);
        let reverse = evaluate(&rules, &cpu, &mb, MatchMode::RuleBased);
        prop_assert_eq!(forward.compatible, reverse.compatible);
    }

    /// PSU threshold follows the numeric comparison exactly.
    #[test]
    fn prop_wattage_threshold(need in 1u64..5000, supply in 1u64..5000) {
        let rules = RuleSet::standard();
        let mb = Product::new("mb", "Board", "Motherboard")
            .with_attribute("wattage", format!("{need}W"));
        let psu = Product::new("psu", "Supply", "PSU")
            .with_attribute("wattage", format!("{supply}W"));
        let outcome = evaluate(&rules, &mb, &psu, MatchMode::RuleBased);
        prop_assert_eq!(outcome.compatible, supply >= need);
    }

    /// Generic overlap is symmetric in the compatible flag.
    #[test]
    fn prop_generic_overlap_symmetry(v1 in attr_value(), v2 in attr_value()) {
        let rules = RuleSet::standard();
        let a = Product::new("a", "A", "Thing").with_attribute("finish", v1.as_str());
        let b = Product::new("b", "B", "Thing").with_attribute("finish", v2.as_str());
        let forward = evaluate(&rules, &a, &b, MatchMode::GenericOverlap);
        let reverse = evaluate(&rules, &b, &a, MatchMode::GenericOverlap);
        prop_assert_eq!(forward.compatible, reverse.compatible);
    }
}
