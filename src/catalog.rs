//! Catalog store.
//!
//! [`CatalogStore`] is the persistence contract the engine and services
//! consume: products pre-joined with their category name, fetched by id or by
//! filter. [`MemoryCatalog`] is the insertion-ordered reference
//! implementation used by the CLI and the test suite; a real deployment
//! implements the trait over its own persistence collaborator.

use std::path::Path;

use anyhow::Context;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::attrs::AttributeMap;
use crate::types::{Product, ProductId, Slot};

/// Catalog access failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    #[error("Duplicate product id: {0}")]
    DuplicateId(ProductId),

    #[error("Invalid product: {0}")]
    InvalidProduct(String),
}

/// Filter for [`CatalogStore::find_products`]. All criteria are conjunctive;
/// the default filter selects everything.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring over name, brand and model number.
    pub search: Option<String>,
    /// Case-insensitive category name restriction.
    pub category: Option<String>,
    /// Ids to leave out of the result.
    pub exclude: Vec<ProductId>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn exclude(mut self, ids: impl IntoIterator<Item = ProductId>) -> Self {
        self.exclude.extend(ids);
        self
    }

    fn accepts(&self, product: &Product) -> bool {
        if self.exclude.contains(&product.id) {
            return false;
        }
        if let Some(category) = &self.category {
            if !product.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let needle = term.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = product.name.to_lowercase().contains(&needle)
                    || product
                        .brand
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
                    || product
                        .model_number
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

/// The persistence contract consumed by the engine-facing services.
///
/// Implementations return owned snapshots; the engine never holds references
/// into the store across an operation.
pub trait CatalogStore {
    fn find_product(&self, id: &str) -> Option<Product>;
    fn find_products(&self, filter: &ProductFilter) -> Vec<Product>;
}

/// In-memory catalog, insertion-ordered. Iteration order is the contractual
/// "catalog order" the scanner and assembler preserve.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    products: IndexMap<ProductId, Product>,
    next_id: u64,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from existing records (snapshot load, test fixtures).
    /// Later duplicates replace earlier ones.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut catalog = Self::new();
        for product in products {
            catalog.products.insert(product.id.clone(), product);
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Insert a new product. An empty id gets a generated sequential one;
    /// a provided id must not collide.
    pub fn create(&mut self, mut product: Product) -> Result<ProductId, CatalogError> {
        if product.name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct("name is required".into()));
        }
        if product.category.trim().is_empty() {
            return Err(CatalogError::InvalidProduct("category is required".into()));
        }
        if product.id.is_empty() {
            self.next_id += 1;
            product.id = format!("p-{:03}", self.next_id);
        } else if self.products.contains_key(&product.id) {
            return Err(CatalogError::DuplicateId(product.id));
        }
        let id = product.id.clone();
        info!(id = %id, category = %product.category, "product created");
        self.products.insert(id.clone(), product);
        Ok(id)
    }

    /// Replace an existing product record.
    pub fn update(&mut self, product: Product) -> Result<(), CatalogError> {
        match self.products.get_mut(&product.id) {
            Some(slot) => {
                *slot = product;
                Ok(())
            }
            None => Err(CatalogError::NotFound(product.id)),
        }
    }

    /// Merge attribute values into a product, overwriting existing keys.
    pub fn set_attributes(&mut self, id: &str, attrs: &AttributeMap) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        product.attributes.merge(attrs);
        debug!(id, added = attrs.len(), "attributes merged");
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Product, CatalogError> {
        self.products
            .shift_remove(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Union of attribute keys across a category, in first-seen order.
    pub fn available_attributes(&self, category: &str) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for product in self.products.values() {
            if !product.category.eq_ignore_ascii_case(category) {
                continue;
            }
            for key in product.attributes.keys() {
                if !keys.iter().any(|k| k == key) {
                    keys.push(key.to_string());
                }
            }
        }
        keys
    }

    // -------------------------------------------------------------------------
    // Manual compatibility links (curated, distinct from the engine's
    // attribute-derived results)
    // -------------------------------------------------------------------------

    /// Add links from one product to several others (set semantics).
    pub fn link(&mut self, id: &str, targets: &[ProductId]) -> Result<(), CatalogError> {
        for target in targets {
            if !self.products.contains_key(target) {
                return Err(CatalogError::NotFound(target.clone()));
            }
        }
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        for target in targets {
            if !product.compatible_with.contains(target) {
                product.compatible_with.push(target.clone());
            }
        }
        Ok(())
    }

    pub fn unlink(&mut self, id: &str, target: &str) -> Result<(), CatalogError> {
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        product.compatible_with.retain(|t| t != target);
        Ok(())
    }

    /// Whether a curated link from `id` to `target` exists.
    pub fn is_linked(&self, id: &str, target: &str) -> Result<bool, CatalogError> {
        let product = self
            .products
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(product.compatible_with.iter().any(|t| t == target))
    }

    /// Resolve a product's curated links, skipping dangling ids.
    pub fn linked_products(&self, id: &str) -> Result<Vec<Product>, CatalogError> {
        let product = self
            .products
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        Ok(product
            .compatible_with
            .iter()
            .filter_map(|t| self.products.get(t).cloned())
            .collect())
    }

    // -------------------------------------------------------------------------
    // Snapshots
    // -------------------------------------------------------------------------

    pub fn to_json(&self) -> anyhow::Result<String> {
        let products: Vec<&Product> = self.products.values().collect();
        serde_json::to_string_pretty(&products).context("serializing catalog snapshot")
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let products: Vec<Product> =
            serde_json::from_str(json).context("parsing catalog snapshot")?;
        Ok(Self::from_products(products))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading catalog snapshot {}", path.display()))?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), products = catalog.len(), "catalog snapshot loaded");
        Ok(catalog)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("writing catalog snapshot {}", path.display()))
    }
}

impl CatalogStore for MemoryCatalog {
    fn find_product(&self, id: &str) -> Option<Product> {
        self.products.get(id).cloned()
    }

    fn find_products(&self, filter: &ProductFilter) -> Vec<Product> {
        self.products
            .values()
            .filter(|p| filter.accepts(p))
            .cloned()
            .collect()
    }
}

/// Suggested attribute keys per slot category, offered to data-entry UIs.
/// Mirrors the spellings the existing catalog data uses.
pub fn attribute_template(slot: &Slot) -> Option<&'static [&'static str]> {
    match slot {
        Slot::Cpu => Some(&[
            "Processor",
            "Cores",
            "Threads",
            "Base Clock Speed",
            "Boost Clock Speed",
            "L3 Cache",
            "Socket",
            "Chipset",
            "TDP",
            "Integrated Graphics",
            "PCIe Support",
            "Supported RAM Types",
            "Thermal Solution",
        ]),
        Slot::Motherboard => Some(&[
            "Chipset",
            "CPU Socket",
            "Memory Slots",
            "Maximum RAM",
            "Supported RAM Types",
            "Expansion Slots",
            "Integrated Graphics",
            "Audio Codec",
            "LAN",
            "M.2 Slots",
            "Form Factor",
            "Dimensions",
            "BIOS",
            "SATA Ports",
            "USB Ports",
        ]),
        Slot::Ram => Some(&[
            "Capacity",
            "Supported RAM Types",
            "Speed",
            "CAS Latency",
            "Modules",
            "Voltage",
            "ECC",
            "Rank",
            "Form Factor",
            "Interface",
            "Data Rate",
        ]),
        Slot::Storage => Some(&[
            "Storagetype",
            "capacity",
            "interface",
            "formFactor",
            "readSpeed",
            "writeSpeed",
            "cache",
            "enduranceTbw",
            "mtbf",
            "releaseYear",
        ]),
        Slot::Gpu => Some(&[
            "GPU Processor",
            "CUDA Cores",
            "Boost Clock",
            "Memory",
            "Memory Bus",
            "Memory Bandwidth",
            "Stream Processors",
            "TDP",
            "Interface",
            "Dimensions",
            "Power Connectors",
            "Cooling",
            "API Support",
        ]),
        Slot::Psu => Some(&[
            "wattage",
            "formFactor",
            "efficiencyRating",
            "modular",
            "fanSize",
            "connectorTypes",
            "protections",
            "releaseYear",
        ]),
        Slot::Other(_) => None,
    }
}
