//! Attribute accessor layer.
//!
//! Catalog attribute maps are free-form: the same physical property shows up
//! as `socketType`, `Socket`, `RamType`, `ramType` in different records. This
//! module is the single point where that inconsistency is absorbed — every
//! other component resolves attributes through [`Concept`] lookups and never
//! reads the raw map directly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// Concepts
// =============================================================================

/// A named synonym group denoting one physical property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    Socket,
    RamType,
    RamCapacity,
    RamSpeed,
    PcieInterface,
    Wattage,
    StorageType,
}

impl Concept {
    /// Synonym attribute names for this concept, in lookup priority order.
    /// Stored keys are compared to these case-insensitively, so one spelling
    /// per naming family is enough.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Concept::Socket => &["socketType", "socket"],
            Concept::RamType => &["ramType", "memoryType"],
            Concept::RamCapacity => &["ramMemoryCapacity"],
            Concept::RamSpeed => &["ramSpeed"],
            Concept::PcieInterface => &["pcieInterface", "pcieVersion", "pcie"],
            Concept::Wattage => &["wattage"],
            Concept::StorageType => &["storageType"],
        }
    }

    /// Canonical key spelling reported in match results.
    pub fn primary_key(&self) -> &'static str {
        self.synonyms()[0]
    }
}

// =============================================================================
// Attribute map
// =============================================================================

/// Free-form specification attributes, insertion-ordered.
///
/// Values are stored verbatim; normalization (trim + lowercase) happens at
/// lookup time so the stored record round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, String>);

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(key)
    }

    /// Exact-key lookup, value verbatim. Generic-overlap matching uses this;
    /// concept lookups go through [`AttributeMap::concept`].
    pub fn get_exact(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge `other` into self, overwriting existing keys.
    pub fn merge(&mut self, other: &AttributeMap) {
        for (k, v) in other.iter() {
            self.0.insert(k.to_string(), v.to_string());
        }
    }

    /// Resolve a concept: the first synonym (in priority order) present with a
    /// non-empty value wins. The value comes back trimmed and lowercased.
    /// Returns `None` when no synonym is present — unknown, not incompatible.
    pub fn concept(&self, concept: Concept) -> Option<String> {
        for synonym in concept.synonyms() {
            for (key, value) in &self.0 {
                if key.eq_ignore_ascii_case(synonym) {
                    let normalized = normalize_value(value);
                    if !normalized.is_empty() {
                        return Some(normalized);
                    }
                }
            }
        }
        None
    }
}

impl FromIterator<(String, String)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Trim and lowercase an attribute value.
pub fn normalize_value(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parse a wattage-style value by stripping every non-digit character first.
/// `"650W"` → 650, `" 750 Watt "` → 750. Returns `None` when nothing numeric
/// remains; threshold rules treat that as a non-match, never an error.
pub fn parse_watts(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
