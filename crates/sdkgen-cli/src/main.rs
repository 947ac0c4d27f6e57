//! sdkgen CLI - Client SDK generator
//!
//! Commands:
//! - `sdkgen build` - Generate every enabled backend package
//! - `sdkgen check` - Validate `build.yml` and the entity definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod build;
mod check;

/// Stub templates shipped with the workspace
const DEFAULT_TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

#[derive(Parser, Debug)]
#[command(name = "sdkgen")]
#[command(author, version, about = "Generate client SDKs from YAML definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the SDK packages listed in build.outputs
    Build {
        /// Path to the project (default: current directory)
        project: Option<PathBuf>,

        /// Directory holding the per-backend stub templates
        #[arg(short, long, default_value = DEFAULT_TEMPLATES)]
        templates: PathBuf,

        /// Log each generated file
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate build.yml and the definitions without writing anything
    Check {
        /// Path to the project (default: current directory)
        project: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            project,
            templates,
            verbose,
        } => {
            init_tracing(verbose);
            build::run(project, templates)?;
        }
        Commands::Check { project } => {
            init_tracing(false);
            check::run(project)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn project_dir(project: Option<PathBuf>) -> PathBuf {
    project.unwrap_or_else(|| PathBuf::from("."))
}
