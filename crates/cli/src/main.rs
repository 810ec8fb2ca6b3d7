//! Entry point for the command-line interface.
//! Delegates to dedicated modules for argument handling, manifest compilation
//! and data-directory resolution.

use olo::args::{parse_cli, Commands};
use olo::datadir::run_data_dir;
use olo::manifest::{run_compile, run_list};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = parse_cli();
    match cli.command {
        Commands::Compile { out } => run_compile(&out),
        Commands::List => run_list(),
        Commands::DataDir { plugin_id } => run_data_dir(&plugin_id),
    }
}
