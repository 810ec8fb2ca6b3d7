//! `data-dir` command handler.

use anyhow::Result;
use descriptor::data_paths;

/// Resolves, creates and prints the sandboxed data directory for a plugin id.
pub fn run_data_dir(plugin_id: &str) -> Result<()> {
    let dir = data_paths::ensure_plugin_dir(plugin_id)?;
    println!("{}", dir.display());
    Ok(())
}
