//! CLI Module
//!
//! Command-line interface for the Echoline delay processor.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Echoline - circular-buffer delay/echo processor
#[derive(Parser, Debug)]
#[command(name = "echoline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a WAV file through the delay, block by block
    #[command(name = "process")]
    Process {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,

        /// Preset file to load parameters from
        #[arg(long)]
        preset: Option<PathBuf>,

        /// Delay time in seconds (overrides preset)
        #[arg(short = 't', long)]
        delay_time: Option<f32>,

        /// Dry mix level 0-1 (overrides preset)
        #[arg(long)]
        dry: Option<f32>,

        /// Wet mix level 0-1 (overrides preset)
        #[arg(long)]
        wet: Option<f32>,

        /// Feedback amount 0-1 (overrides preset)
        #[arg(long)]
        feedback: Option<f32>,

        /// Processing block size in samples
        #[arg(long, default_value_t = 512)]
        block_size: usize,

        /// Extra seconds of silence to process after the input, so
        /// trailing echoes are not cut off
        #[arg(long)]
        tail_secs: Option<f32>,

        /// Output bit depth: 16, 24 or 32
        #[arg(long, default_value_t = 24)]
        bit_depth: u16,
    },

    /// Write a preset file from parameter values
    #[command(name = "save-preset")]
    SavePreset {
        /// Path for the preset file
        path: PathBuf,

        /// Delay time in seconds
        #[arg(short = 't', long, default_value_t = 0.5)]
        delay_time: f32,

        /// Dry mix level 0-1
        #[arg(long, default_value_t = 0.5)]
        dry: f32,

        /// Wet mix level 0-1
        #[arg(long, default_value_t = 0.5)]
        wet: f32,

        /// Feedback amount 0-1
        #[arg(long, default_value_t = 0.75)]
        feedback: f32,
    },

    /// Print the contents of a preset file
    #[command(name = "show-preset")]
    ShowPreset {
        /// Path to the preset file
        path: PathBuf,
    },
}
