//! Stacksmith - Declarative CloudFormation stacks for a private database environment
//!
//! This is the main entry point for the Stacksmith CLI. The program runs
//! once: it composes the three stack declarations, synthesizes them, and
//! exits.

use stacksmith::cli::{self, Cli, Commands, SynthArgs};
use stacksmith::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    };

    let result = match &cli.command {
        Some(Commands::Synth(args)) => cli::run_synth(&config, args),
        Some(Commands::List) => cli::run_list(&config),
        None => cli::run_synth(&config, &SynthArgs { out_dir: None }),
    };

    match result {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(verbosity >= 3).with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}
