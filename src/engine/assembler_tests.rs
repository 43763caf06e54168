use super::*;

fn catalog() -> Vec<Product> {
    vec![
        Product::new("mb-am5", "B650 Board", "Motherboard")
            .with_attribute("socketType", "AM5")
            .with_attribute("ramType", "DDR5")
            .with_attribute("pcieVersion", "4.0")
            .with_attribute("wattage", "500W")
            .with_attribute("storageType", "NVMe"),
        Product::new("mb-lga", "Z790 Board", "Motherboard")
            .with_attribute("socketType", "LGA1700")
            .with_attribute("ramType", "DDR4")
            .with_attribute("pcieVersion", "5.0"),
        Product::new("cpu-am5", "Ryzen 7", "CPU").with_attribute("socketType", "am5"),
        Product::new("cpu-lga", "Core i5", "CPU").with_attribute("socketType", "lga1700"),
        Product::new("ram-ddr5", "Fury DDR5", "RAM").with_attribute("ramType", "ddr5"),
        Product::new("gpu-4", "RTX 4070", "GPU").with_attribute("pcieVersion", "4.0"),
        Product::new("gpu-5", "RX 9700", "GPU").with_attribute("pcie", "5.0"),
        Product::new("psu-650", "650W Gold", "PSU").with_attribute("wattage", "650W"),
        Product::new("sto-nvme", "NVMe 2TB", "Storage").with_attribute("Storagetype", "nvme"),
    ]
}

// =========================================================================
// assemble_builds
// =========================================================================

#[test]
fn test_assemble_complete_build() {
    let rules = RuleSet::standard();
    let builds = assemble_builds(&rules, &catalog());

    // Only the AM5 board has candidates in all three required slots;
    // the LGA board has no DDR4 RAM in the catalog and is dropped.
    assert_eq!(builds.len(), 1);
    let build = &builds[0];
    assert_eq!(build.motherboard.id, "mb-am5");
    assert_eq!(build.cpus.len(), 1);
    assert_eq!(build.cpus[0].id, "cpu-am5");
    assert_eq!(build.rams[0].id, "ram-ddr5");
    assert_eq!(build.gpus[0].id, "gpu-4");
}

#[test]
fn test_assemble_never_emits_partial_build() {
    let rules = RuleSet::standard();
    // Socket matches a CPU, but no RAM in the catalog matches the board
    let partial = vec![
        Product::new("mb-1", "Board", "Motherboard")
            .with_attribute("socketType", "am5")
            .with_attribute("ramType", "ddr5")
            .with_attribute("pcieVersion", "4.0"),
        Product::new("cpu-1", "Chip", "CPU").with_attribute("socketType", "am5"),
        Product::new("ram-1", "Stick", "RAM").with_attribute("ramType", "ddr4"),
        Product::new("gpu-1", "Card", "GPU").with_attribute("pcieVersion", "4.0"),
    ];
    assert!(assemble_builds(&rules, &partial).is_empty());
}

#[test]
fn test_assemble_skips_attributeless_motherboard() {
    let rules = RuleSet::standard();
    let bare = vec![
        Product::new("mb-1", "Bare Board", "Motherboard"),
        Product::new("cpu-1", "Chip", "CPU").with_attribute("socketType", "am5"),
    ];
    assert!(assemble_builds(&rules, &bare).is_empty());
}

// =========================================================================
// builds_for_selection
// =========================================================================

#[test]
fn test_selection_motherboard_yields_single_bundle() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let mb = catalog.iter().find(|p| p.id == "mb-am5").unwrap();

    let builds = builds_for_selection(&rules, mb, &catalog);
    assert_eq!(builds.len(), 1);
    assert!(builds[0].motherboard.is_none());
    assert_eq!(builds[0].cpus.len(), 1);
    assert_eq!(builds[0].rams.len(), 1);
    assert_eq!(builds[0].gpus.len(), 1);
}

#[test]
fn test_selection_motherboard_bundle_emitted_even_if_sparse() {
    let rules = RuleSet::standard();
    let sparse = vec![
        Product::new("mb-1", "Board", "Motherboard").with_attribute("socketType", "am5"),
        Product::new("cpu-1", "Chip", "CPU").with_attribute("socketType", "am5"),
    ];
    let builds = builds_for_selection(&rules, &sparse[0], &sparse);
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].cpus.len(), 1);
    assert!(builds[0].rams.is_empty());
    assert!(builds[0].gpus.is_empty());
}

#[test]
fn test_selection_cpu_reverses_to_motherboards() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let cpu = catalog.iter().find(|p| p.id == "cpu-am5").unwrap();

    let builds = builds_for_selection(&rules, cpu, &catalog);
    assert_eq!(builds.len(), 1);
    let build = &builds[0];
    assert_eq!(build.motherboard.as_ref().unwrap().id, "mb-am5");
    // The selection's own slot stays empty; the other two are filled
    assert!(build.cpus.is_empty());
    assert_eq!(build.rams.len(), 1);
    assert_eq!(build.gpus.len(), 1);
}

#[test]
fn test_selection_gpu_one_bundle_per_matching_board() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let gpu = catalog.iter().find(|p| p.id == "gpu-5").unwrap();

    let builds = builds_for_selection(&rules, gpu, &catalog);
    assert_eq!(builds.len(), 1);
    assert_eq!(builds[0].motherboard.as_ref().unwrap().id, "mb-lga");
    assert!(builds[0].gpus.is_empty());
    assert_eq!(builds[0].cpus.len(), 1);
    assert_eq!(builds[0].cpus[0].id, "cpu-lga");
}

#[test]
fn test_selection_psu_yields_no_builds() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let psu = catalog.iter().find(|p| p.id == "psu-650").unwrap();
    assert!(builds_for_selection(&rules, psu, &catalog).is_empty());
}

// =========================================================================
// narrow_sequential
// =========================================================================

fn remaining_without(catalog: &[Product], selected: &[&str]) -> Vec<Product> {
    catalog
        .iter()
        .filter(|p| !selected.contains(&p.id.as_str()))
        .cloned()
        .collect()
}

#[test]
fn test_narrow_cpu_only_returns_matching_motherboards() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let cpu = catalog.iter().find(|p| p.id == "cpu-am5").unwrap().clone();
    let remaining = remaining_without(&catalog, &["cpu-am5"]);

    let result = narrow_sequential(&rules, &[cpu], &remaining);
    let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["mb-am5"]);
}

#[test]
fn test_narrow_motherboard_only_spans_all_slots() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let mb = catalog.iter().find(|p| p.id == "mb-am5").unwrap().clone();
    let remaining = remaining_without(&catalog, &["mb-am5"]);

    let result = narrow_sequential(&rules, &[mb], &remaining);
    let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
    // CPU, RAM, GPU, PSU and Storage all narrow against the board
    assert_eq!(ids, vec!["cpu-am5", "ram-ddr5", "gpu-4", "psu-650", "sto-nvme"]);
}

#[test]
fn test_narrow_both_filters_ram_and_gpu_only() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let cpu = catalog.iter().find(|p| p.id == "cpu-am5").unwrap().clone();
    let mb = catalog.iter().find(|p| p.id == "mb-am5").unwrap().clone();
    let remaining = remaining_without(&catalog, &["cpu-am5", "mb-am5"]);

    let result = narrow_sequential(&rules, &[cpu, mb], &remaining);
    let ids: Vec<&str> = result.iter().map(|p| p.id.as_str()).collect();
    // PSU/Storage drop out in this state even though the board matches them
    assert_eq!(ids, vec!["ram-ddr5", "gpu-4"]);
}

#[test]
fn test_narrow_ram_only_does_not_narrow() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let ram = catalog.iter().find(|p| p.id == "ram-ddr5").unwrap().clone();
    let remaining = remaining_without(&catalog, &["ram-ddr5"]);

    let result = narrow_sequential(&rules, &[ram], &remaining);
    assert_eq!(result.len(), remaining.len());
}

#[test]
fn test_narrow_no_selection_returns_remaining() {
    let rules = RuleSet::standard();
    let catalog = catalog();
    let result = narrow_sequential(&rules, &[], &catalog);
    assert_eq!(result, catalog);
}

#[test]
fn test_narrow_socket_is_case_insensitive() {
    let rules = RuleSet::standard();
    let cpu = Product::new("cpu-1", "Chip", "CPU").with_attribute("socketType", "AM5");
    let boards = vec![
        Product::new("mb-1", "Lower Board", "Motherboard").with_attribute("socketType", "am5"),
        Product::new("mb-2", "Other Board", "Motherboard").with_attribute("socketType", "lga1700"),
    ];
    let result = narrow_sequential(&rules, &[cpu], &boards);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "mb-1");
}
