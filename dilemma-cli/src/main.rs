//! DILEMMA CLI - Command-line interface
//!
//! Commands:
//! - run: run a simulation and write the statistics series
//! - init-config: write a default parameter file

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod render;
mod run;

#[derive(Parser)]
#[command(name = "dilemma")]
#[command(about = "Spatial iterated prisoner's dilemma evolution simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run(run::RunArgs),
    /// Write a default parameter file
    InitConfig {
        #[arg(long, default_value = "params.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::InitConfig { output } => run::write_default_config(&output),
    }
}
