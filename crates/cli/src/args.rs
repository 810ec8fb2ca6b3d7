use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Open LLM Orchestrator plugin toolkit",
    long_about = "Compiles the built-in plugin descriptors into a plugin.yaml manifest, \
lists the available plugins, and resolves per-plugin data directories.

Examples:
  olo compile --out dist/        # Write dist/plugin.yaml
  olo list                       # List built-in plugins
  olo data-dir com.openllm.plugin.rag.file.ingestion",
    subcommand_required = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile the built-in plugin descriptors into a plugin.yaml manifest
    Compile {
        /// Directory the manifest is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List the built-in plugins with version and type
    List,
    /// Print (and create) the sandboxed data directory of a plugin
    #[command(name = "data-dir")]
    DataDir {
        /// Plugin id, e.g. com.openllm.plugin.caching.memory
        plugin_id: String,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
