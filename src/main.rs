//! Echoline CLI - Delay Processor
//!
//! Command-line host for the Echoline delay engine.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::info;

use echoline::cli::commands::{self, ParamOverrides};
use echoline::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger; -v raises the default level to debug
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    info!("Echoline Delay Processor v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Process {
            input,
            output,
            preset,
            delay_time,
            dry,
            wet,
            feedback,
            block_size,
            tail_secs,
            bit_depth,
        } => commands::process_file(
            &input,
            &output,
            preset.as_deref(),
            ParamOverrides {
                delay_time,
                dry,
                wet,
                feedback,
            },
            block_size,
            tail_secs,
            bit_depth,
        )
        .with_context(|| format!("failed to process {}", input.display()))?,

        Commands::SavePreset {
            path,
            delay_time,
            dry,
            wet,
            feedback,
        } => commands::save_preset(&path, delay_time, dry, wet, feedback)
            .with_context(|| format!("failed to save preset {}", path.display()))?,

        Commands::ShowPreset { path } => commands::show_preset(&path)
            .with_context(|| format!("failed to read preset {}", path.display()))?,
    }

    Ok(())
}
