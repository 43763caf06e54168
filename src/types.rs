//! Core domain types shared across the catalog and the compatibility engine.

use serde::{Deserialize, Serialize};

use crate::attrs::AttributeMap;

/// Opaque product identifier, assigned by the persistence collaborator.
pub type ProductId = String;

/// Slot category a product occupies in a build.
///
/// Category names arrive as free-form strings from the catalog and are
/// compared case-insensitively throughout; anything outside the six known
/// slot categories is carried as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Cpu,
    Motherboard,
    Ram,
    Gpu,
    Psu,
    Storage,
    Other(String),
}

impl Slot {
    /// Parse a category name. Never fails; unknown names become `Other`
    /// (stored lowercased so equality stays case-insensitive).
    pub fn parse(name: &str) -> Slot {
        match name.trim().to_lowercase().as_str() {
            "cpu" => Slot::Cpu,
            "motherboard" => Slot::Motherboard,
            "ram" => Slot::Ram,
            "gpu" => Slot::Gpu,
            "psu" => Slot::Psu,
            "storage" => Slot::Storage,
            other => Slot::Other(other.to_string()),
        }
    }

    /// The slots a complete build must fill besides the motherboard.
    pub fn required_build_slots() -> [Slot; 3] {
        [Slot::Cpu, Slot::Ram, Slot::Gpu]
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Cpu => write!(f, "CPU"),
            Slot::Motherboard => write!(f, "Motherboard"),
            Slot::Ram => write!(f, "RAM"),
            Slot::Gpu => write!(f, "GPU"),
            Slot::Psu => write!(f, "PSU"),
            Slot::Storage => write!(f, "Storage"),
            Slot::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Stock status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock,
}

impl Default for ProductStatus {
    fn default() -> Self {
        ProductStatus::Active
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "Active"),
            ProductStatus::Inactive => write!(f, "Inactive"),
            ProductStatus::OutOfStock => write!(f, "Out of Stock"),
        }
    }
}

/// A catalog product, pre-joined with its category name.
///
/// `attributes` is free-form: keys are whatever spelling the data entry used
/// (`"socketType"`, `"Socket"`, `"RamType"`, ...), values are strings or
/// numbers-as-strings. An absent key means "unknown", never "incompatible".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Category display name as stored (compared case-insensitively).
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model_number: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    pub selling_rate: f64,
    #[serde(default)]
    pub cost_rate: Option<f64>,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub attributes: AttributeMap,
    /// Manually curated compatibility links, maintained by the catalog store.
    #[serde(default)]
    pub compatible_with: Vec<ProductId>,
}

impl Product {
    /// Minimal constructor for the fields the engine cares about.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            brand: None,
            model_number: None,
            quantity: 0,
            selling_rate: 0.0,
            cost_rate: None,
            status: ProductStatus::Active,
            warranty: None,
            attributes: AttributeMap::default(),
            compatible_with: Vec::new(),
        }
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_price(mut self, selling_rate: f64) -> Self {
        self.selling_rate = selling_rate;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Slot category, parsed from the stored category name.
    pub fn slot(&self) -> Slot {
        Slot::parse(&self.category)
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary::from(self)
    }
}

/// Compact product projection used in response payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub selling_rate: f64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            brand: product.brand.clone(),
            selling_rate: product.selling_rate,
        }
    }
}
