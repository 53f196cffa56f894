//! Fixedgrid CLI
//!
//! Command-line host for the fixedgrid placement engine.
//!
//! Lays out scene files or the built-in demo dataset and prints the
//! resulting placements as a table or as JSON.

mod config;
mod sample;
mod scene;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use fixedgrid_core_layout::check::{find_full_span_violation, find_overlap};
use fixedgrid_core_layout::{GridConfig, LayoutEngine, Placement};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

use crate::config::{Config, GridOverrides};
use crate::scene::Scene;

#[derive(Parser)]
#[command(name = "fixedgrid")]
#[command(author, version, about = "Lay out items on a fixed-order staggered grid")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a scene file and print the placements
    Layout {
        /// Path to the scene TOML file
        scene: PathBuf,
        /// Override the number of columns
        #[arg(short, long)]
        columns: Option<usize>,
        /// Override the grid width in pixels
        #[arg(short, long)]
        width: Option<i32>,
        /// Print a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Lay out the built-in demo dataset
    Sample {
        /// Override the number of columns
        #[arg(short, long)]
        columns: Option<usize>,
        /// Number of demo items
        #[arg(short = 'n', long, default_value_t = sample::DEFAULT_ITEMS)]
        items: usize,
        /// Print a JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Lay out a scene file and check the placement invariants
    Verify {
        /// Path to the scene TOML file
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for log level)
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {:#}. Using defaults.", e);
        Config::default()
    });

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.behavior.level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Layout {
            scene,
            columns,
            width,
            json,
        } => {
            let loaded = Scene::load(&scene)?;
            let grid = resolve_grid(&config.grid, loaded.grid.as_ref(), columns, width);
            info!("Laying out {} items from {}", loaded.items.len(), scene.display());
            let engine = loaded.lay_out(&grid);
            print_layout(&engine, json)?;
        }
        Commands::Sample {
            columns,
            items,
            json,
        } => {
            let grid = resolve_grid(&config.grid, None, columns, None);
            let engine = sample::sample_scene(items, grid.column_count).lay_out(&grid);
            print_layout(&engine, json)?;
        }
        Commands::Verify { scene } => {
            let loaded = Scene::load(&scene)?;
            let grid = resolve_grid(&config.grid, loaded.grid.as_ref(), None, None);
            let engine = loaded.lay_out(&grid);
            verify(&engine, loaded.items.len())?;
            println!(
                "OK: {} items in {} columns, content extent {}",
                engine.frontier(),
                engine.column_count(),
                engine.content_extent()
            );
        }
    }

    Ok(())
}

/// Merge configuration layers: scene `[grid]` over the loaded config, then
/// command-line overrides. Each layer only replaces the fields it sets. The
/// result is validated.
fn resolve_grid(
    base: &GridConfig,
    scene: Option<&GridOverrides>,
    columns: Option<usize>,
    width: Option<i32>,
) -> GridConfig {
    let mut grid = base.clone();
    if let Some(scene) = scene {
        scene.apply_to(&mut grid);
    }
    let flags = GridOverrides {
        column_count: columns,
        width,
        ..Default::default()
    };
    flags.apply_to(&mut grid);
    grid.validate();
    debug!("Resolved grid config: {:?}", grid);
    grid
}

/// Check the engine's placements, failing on the first broken invariant.
fn verify(engine: &LayoutEngine, expected: usize) -> Result<()> {
    let placements: Vec<Placement> = engine.placements().copied().collect();

    if placements.len() != expected {
        bail!(
            "Placed {} of {} items",
            placements.len(),
            expected
        );
    }
    if let Some((a, b)) = find_overlap(&placements) {
        bail!("Items {} and {} overlap", a, b);
    }
    if let Some((full, offending)) =
        find_full_span_violation(&placements, engine.column_count())
    {
        bail!(
            "Item {} starts above the bottom of full-span item {}",
            offending,
            full
        );
    }
    Ok(())
}

fn print_layout(engine: &LayoutEngine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        return Ok(());
    }

    println!(
        "{:>8}  {:>7}  {:>6}  {:>6}  {:>6}  {:>6}",
        "position", "columns", "left", "top", "right", "bottom"
    );
    for p in engine.placements() {
        let columns = p.columns();
        println!(
            "{:>8}  {:>7}  {:>6}  {:>6}  {:>6}  {:>6}",
            p.position,
            format!("{}..{}", columns.start, columns.end),
            p.rect.left,
            p.rect.top,
            p.rect.right,
            p.rect.bottom
        );
    }
    println!(
        "\n{} items in {} columns, content extent {}",
        engine.frontier(),
        engine.column_count(),
        engine.content_extent()
    );
    Ok(())
}
