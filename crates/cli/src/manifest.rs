//! `compile` and `list` command handlers.

use std::path::Path;

use anyhow::{bail, Context, Result};
use descriptor::package::PLUGIN_YAML;
use descriptor::{compile_manifest, write_manifest};
use plugins::builtin_descriptors;
use tracing::info;

/// Compiles the built-in descriptor set and writes `plugin.yaml` to `out`.
/// Declaration errors abort without writing a partial manifest.
pub fn run_compile(out: &Path) -> Result<()> {
    let descriptors = builtin_descriptors();
    let report = compile_manifest(&descriptors);
    for error in &report.errors {
        eprintln!("error: {error}");
    }
    if !report.is_clean() {
        bail!("{} plugin declaration(s) failed to compile", report.errors.len());
    }
    std::fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;
    write_manifest(out, &descriptors)
        .with_context(|| format!("failed to write {} to {}", PLUGIN_YAML, out.display()))?;
    info!(count = descriptors.len(), out = %out.display(), "manifest written");
    println!("{}", out.join(PLUGIN_YAML).display());
    Ok(())
}

/// Prints one line per built-in plugin: id, version and type.
pub fn run_list() -> Result<()> {
    for d in builtin_descriptors() {
        println!("{}\t{}\t{}", d.id, d.version, d.category);
    }
    Ok(())
}
