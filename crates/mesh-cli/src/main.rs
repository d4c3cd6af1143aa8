//! mesh-topo CLI: finalize and gradient-limit 2D triangle meshes.
//!
//! Usage: mesh-topo [OPTIONS] <COMMAND>
//!
//! Run `mesh-topo --help` for available commands.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "mesh-topo")]
#[command(author, version, about = "2D mesh topology finalization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format for reports
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Suppress report output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

/// How reports are written to stdout.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a validation report
    Info {
        /// Input mesh file (.msh or .json)
        input: PathBuf,
    },

    /// Sieve, remove pinched nodes and assign ID tags until clean
    Finalize {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,

        /// Remove regions at or below this area (default: keep only the largest)
        #[arg(long)]
        sieve_area: Option<f64>,

        /// Maximum repair rounds
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Pipeline config file (TOML or JSON) supplying defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Remove small disconnected regions once
    Sieve {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,

        /// Remove regions at or below this area (default: keep only the largest)
        #[arg(long)]
        area: Option<f64>,
    },

    /// Limit the gradient of the vertex scalar field
    Limgrad {
        /// Input mesh file with values
        input: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum slope along an edge
        #[arg(long)]
        dfdx: f64,

        /// Maximum relaxation passes
        #[arg(long, default_value = "100")]
        imax: usize,
    },

    /// Run a pipeline config: finalize, then limit the gradient if configured
    Run {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,

        /// Pipeline config file (TOML or JSON)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "mesh_topology=info",
        (false, 1) => "mesh_topology=debug",
        _ => "mesh_topology=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let (format, quiet) = (cli.format, cli.quiet);
    debug!("{:?}", cli.command);
    match cli.command {
        Commands::Info { input } => commands::info::run(&input, format, quiet),
        Commands::Finalize {
            input,
            output,
            sieve_area,
            max_iterations,
            config,
        } => commands::finalize::run(
            &input,
            &output,
            commands::finalize::Overrides {
                sieve_area,
                max_iterations,
                config,
            },
            format,
            quiet,
        ),
        Commands::Sieve {
            input,
            output,
            area,
        } => commands::sieve::run(&input, &output, area, format, quiet),
        Commands::Limgrad {
            input,
            output,
            dfdx,
            imax,
        } => commands::limgrad::run(&input, &output, dfdx, imax, format, quiet),
        Commands::Run {
            input,
            output,
            config,
        } => commands::run::run(&input, &output, &config, format, quiet),
    }
}
