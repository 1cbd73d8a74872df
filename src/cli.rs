//! CLI for Stacksmith.
//!
//! Argument parsing and the two subcommands: `synth` writes the templates
//! and manifest, `list` prints the stacks in deploy order.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::stacks::compose;

/// Stacksmith - Declarative CloudFormation stacks for a private database environment
#[derive(Parser, Debug, Clone)]
#[command(name = "stacksmith")]
#[command(author = "Stacksmith Contributors")]
#[command(version)]
#[command(about = "Synthesize the VPC, bastion-host, and RDS stacks", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute; defaults to `synth`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true, env = "STACKSMITH_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Synthesize the templates and deployment manifest
    Synth(SynthArgs),

    /// List the stacks in deploy order
    List,
}

/// Arguments for the `synth` subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct SynthArgs {
    /// Output directory (overrides configuration)
    #[arg(short = 'o', long, env = "STACKSMITH_OUT_DIR")]
    pub out_dir: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runs the `synth` subcommand.
pub fn run_synth(config: &Config, args: &SynthArgs) -> Result<i32> {
    let out_dir = args
        .out_dir
        .clone()
        .unwrap_or_else(|| config.synth.out_dir.clone());

    let app = compose(config)?;
    let written = app.synth_to_dir(&out_dir)?;

    info!(
        stacks = app.stacks().len(),
        files = written.len(),
        out_dir = %out_dir.display(),
        "synthesis complete"
    );
    for path in &written {
        println!("{}", path.display());
    }
    Ok(0)
}

/// Runs the `list` subcommand.
pub fn run_list(config: &Config) -> Result<i32> {
    let app = compose(config)?;
    for stack in app.stacks() {
        if stack.dependencies().is_empty() {
            println!("{}", stack.name());
        } else {
            println!("{}  (depends on: {})", stack.name(), stack.dependencies().join(", "));
        }
    }
    Ok(0)
}
