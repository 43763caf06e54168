//! armar CLI — operator surface over the compatibility engine.
//!
//! Loads a catalog snapshot (JSON) and runs engine operations against it.
//! The HTTP storefront talks to the same service layer; this binary exists
//! for operators and smoke checks.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use armar::config::ArmarConfig;
use armar::report::dashboard_stats;
use armar::{CatalogService, CatalogStore, MatchMode, MemoryCatalog, ProductFilter};

#[derive(Parser)]
#[command(name = "armar")]
#[command(version, about = "PC component compatibility engine and catalog tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(long, global = true, default_value = "armar.toml")]
    config: PathBuf,

    /// Catalog snapshot path (overrides config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,
}

/// CLI-facing spelling of the match strategies.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    RuleBased,
    GenericOverlap,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::RuleBased => MatchMode::RuleBased,
            ModeArg::GenericOverlap => MatchMode::GenericOverlap,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compatible products for one product
    Compat {
        /// Product id
        id: String,

        /// Matching strategy
        #[arg(long, value_enum, default_value = "rule-based")]
        mode: ModeArg,

        /// List every product with a compatibility flag instead
        #[arg(long)]
        all: bool,
    },

    /// Complete builds, or builds anchored on one product
    Builds {
        /// Anchor product id
        id: Option<String>,
    },

    /// Narrow remaining candidates against selected product ids
    Narrow {
        /// Selected product ids, in selection order
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Many-to-many compatibility across the whole catalog
    ScanAll {
        /// Matching strategy
        #[arg(long, value_enum, default_value = "rule-based")]
        mode: ModeArg,
    },

    /// Dashboard statistics over the catalog snapshot
    Stats,
}

fn init_tracing(verbose: bool, debug: bool) {
    let default_level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.debug);

    let config = ArmarConfig::load_or_default(&cli.config)?;
    let snapshot_path = cli
        .catalog
        .clone()
        .unwrap_or_else(|| config.catalog.snapshot_path.clone());
    let catalog = MemoryCatalog::load(&snapshot_path)
        .with_context(|| format!("loading catalog from {}", snapshot_path.display()))?;
    info!(products = catalog.len(), "catalog ready");

    let service = CatalogService::new(catalog);

    match cli.command {
        Commands::Compat { id, mode, all } => {
            if all {
                let flagged = service.flagged_products(&id, mode.into())?;
                if cli.json {
                    return print_json(&flagged);
                }
                for item in &flagged {
                    let marker = if item.is_compatible {
                        "✓".bright_green()
                    } else {
                        "✗".dimmed()
                    };
                    println!(
                        "  {} {} [{}] {}",
                        marker,
                        item.product.name,
                        item.product.category.cyan(),
                        item.product.id.dimmed()
                    );
                }
            } else {
                let report = service.compatibility_for(&id, mode.into())?;
                if cli.json {
                    return print_json(&report);
                }
                println!(
                    "{} {} [{}]",
                    "Product:".bold(),
                    report.product.name,
                    report.product.category.cyan()
                );
                if let Some(reason) = report.reason {
                    println!("  {} {:?}", "no matches:".yellow(), reason);
                }
                for item in &report.compatible_products {
                    let matched: Vec<String> = item
                        .matched_on
                        .iter()
                        .map(|m| format!("{}={}", m.key, m.value))
                        .collect();
                    println!(
                        "  {} {} [{}] {}",
                        "✓".bright_green(),
                        item.product.name,
                        item.product.category.cyan(),
                        matched.join(", ").dimmed()
                    );
                }
                println!("{} {}", "Total compatible:".bold(), report.total_compatible);
            }
        }

        Commands::Builds { id } => match id {
            Some(id) => {
                let report = service.builds_for(&id)?;
                if cli.json {
                    return print_json(&report);
                }
                println!(
                    "{} {} ({} builds)",
                    "Selection:".bold(),
                    report.selection.name,
                    report.total_builds
                );
                for build in &report.builds {
                    if let Some(mb) = &build.motherboard {
                        println!("  {} {}", "board:".bold(), mb.name);
                    }
                    println!(
                        "    cpus: {}  rams: {}  gpus: {}",
                        build.cpus.len(),
                        build.rams.len(),
                        build.gpus.len()
                    );
                }
            }
            None => {
                let report = service.builds();
                if cli.json {
                    return print_json(&report);
                }
                println!("{} {}", "Total builds:".bold(), report.total_builds);
                for build in &report.builds {
                    println!(
                        "  {} {} — {} cpus, {} rams, {} gpus",
                        "board:".bold(),
                        build.motherboard.name,
                        build.cpus.len(),
                        build.rams.len(),
                        build.gpus.len()
                    );
                }
            }
        },

        Commands::Narrow { ids } => {
            let report = service.narrow(&ids)?;
            if cli.json {
                return print_json(&report);
            }
            let selected: Vec<&str> = report.selections.iter().map(|s| s.name.as_str()).collect();
            println!("{} {}", "Selected:".bold(), selected.join(", "));
            for candidate in &report.candidates {
                println!(
                    "  {} {} [{}]",
                    "→".bright_green(),
                    candidate.name,
                    candidate.category.cyan()
                );
            }
            println!("{} {}", "Candidates:".bold(), report.candidates.len());
        }

        Commands::ScanAll { mode } => {
            let view = service.catalog_compatibility(mode.into());
            if cli.json {
                return print_json(&view);
            }
            println!(
                "{} {} products, {} with matches",
                "Catalog:".bold(),
                view.total_products,
                view.products_with_matches
            );
            for entry in &view.entries {
                println!(
                    "  {} [{}] → {} compatible",
                    entry.product.name,
                    entry.product.category.cyan(),
                    entry.compatible_with.len()
                );
            }
        }

        Commands::Stats => {
            let snapshot = service.store().find_products(&ProductFilter::all());
            let stats = dashboard_stats(
                &snapshot,
                std::iter::empty(),
                config.dashboard.low_stock_threshold,
            );
            if cli.json {
                return print_json(&stats);
            }
            println!("{} {}", "Products:".bold(), stats.total_products);
            for (category, count) in &stats.products_by_category {
                println!("  {} {}", category.cyan(), count);
            }
            println!("{} {}", "Stock units:".bold(), stats.total_stock_units);
            println!("{} {}", "Out of stock:".bold(), stats.out_of_stock);
            if !stats.low_stock.is_empty() {
                println!("{}", "Low stock:".yellow().bold());
                for product in &stats.low_stock {
                    println!("  {} ({})", product.name, product.id.dimmed());
                }
            }
        }
    }

    Ok(())
}
