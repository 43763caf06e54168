//! armar configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Top-level configuration, loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmarConfig {
    pub catalog: CatalogConfig,
    pub cart: CartConfig,
    pub orders: OrdersConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Catalog snapshot the CLI loads.
    pub snapshot_path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("catalog.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Idle seconds before a session cart expires.
    pub ttl_secs: u64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self { ttl_secs: 30 * 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrdersConfig {
    /// Minimum digits in display ids (`3` gives `O-001`).
    pub id_padding: usize,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self { id_padding: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Quantity at or below which an active product counts as low stock.
    pub low_stock_threshold: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
        }
    }
}

impl ArmarConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from the given path, or fall back to defaults when the file does
    /// not exist.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("serializing config")?;
        std::fs::write(path, content)
            .with_context(|| format!("writing config {}", path.display()))
    }
}
