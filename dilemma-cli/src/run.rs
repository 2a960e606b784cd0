//! Run command - drive the simulation loop
//!
//! ## Architecture (layered granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), run_generations(), save_results()
//! - Level 3: create_rng(), print_best(), formatting utilities

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dilemma_core::{SimConfig, Surface};
use dilemma_stats::TickStats;

use crate::render;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Parameter file (JSON); defaults are used when absent
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the number of generations from the parameter file
    #[arg(long)]
    pub generations: Option<u32>,

    /// RNG seed for reproducible runs (overrides the parameter file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path for the statistics series (JSON)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print the surface after each generation
    #[arg(long)]
    pub render: bool,

    /// Fraction of top-scoring genes to print at the end
    #[arg(long, default_value = "0.02")]
    pub best: f64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run the simulation:
/// 1. Load and validate the configuration
/// 2. Seed the surface with founder cells
/// 3. Run the generation loop, collecting statistics per tick
/// 4. Save the statistics series and print the best genes
pub fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let mut rng = create_rng(args.seed.or(config.seed));

    tracing::info!(
        width = config.surface.width,
        height = config.surface.height,
        generations = config.generations,
        interactions = config.interactions,
        "starting simulation"
    );

    let mut surface = Surface::new(config.clone()).context("invalid configuration")?;
    surface.populate(&mut rng);

    let series = run_generations(&mut surface, &config, &args, &mut rng);
    save_results(&series, &args)?;
    print_best(&surface, args.best);
    Ok(())
}

/// Write a default parameter file
pub fn write_default_config(path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&SimConfig::default())?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote default parameters");
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(generations) = args.generations {
        config.generations = generations;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn run_generations(
    surface: &mut Surface,
    config: &SimConfig,
    args: &RunArgs,
    rng: &mut ChaCha8Rng,
) -> Vec<TickStats> {
    let mut series = Vec::with_capacity(config.generations as usize + 1);
    series.push(dilemma_stats::collect(surface, 0));

    let bar = ProgressBar::new(config.generations as u64);
    for generation in 1..=config.generations {
        surface.tick(config.interactions, rng);
        let stats = dilemma_stats::collect(surface, generation);
        tracing::debug!(
            generation,
            population = stats.population,
            def_frac_mean = stats.def_frac_mean,
            "generation complete"
        );
        if args.render {
            println!("{}", render::render(surface));
        }
        series.push(stats);
        bar.inc(1);

        if surface.population() == 0 {
            tracing::warn!(generation, "population extinct, stopping early");
            break;
        }
    }
    bar.finish_and_clear();
    series
}

fn save_results(series: &[TickStats], args: &RunArgs) -> Result<()> {
    let path = args.output.clone().unwrap_or_else(default_output_path);
    let json = serde_json::to_string_pretty(series)?;
    fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), ticks = series.len(), "statistics written");
    Ok(())
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn default_output_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("dilemma_stats_{stamp}.json"))
}

fn print_best(surface: &Surface, ratio: f64) {
    for cell in surface.get_best_x(ratio) {
        let gene = cell.gene();
        println!(
            "cell {:>5}  score {:>4}  memory {}  defect {:.2}  opening {}  gene {}",
            cell.id(),
            cell.score(),
            gene.mem_size(),
            gene.defect_fraction(),
            gene.initial_move().glyph(),
            gene
        );
    }
}
