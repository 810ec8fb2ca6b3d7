//! Shared data directory for all plugins in a host or container.
//!
//! One environment variable ([`ENV_PLUGIN_DATA_DIR`]) defines the root; each
//! plugin gets a dedicated subfolder keyed by its id so uploads, RAG files
//! and templates resolve at a known location. The root is resolved once per
//! process and cached; [`reset`] drops the cache for test isolation or when
//! the environment changes.
//!
//! Resolution never touches the filesystem; [`ensure_plugin_dir`] is the
//! explicit, idempotent directory-creation step.

use std::path::{Component, Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use anyhow::{bail, Result};
use tracing::debug;

/// Environment variable for the root data directory shared by all plugins.
/// Set in a container to e.g. `/data/olo`; default [`DEFAULT_BASE_DIR`].
pub const ENV_PLUGIN_DATA_DIR: &str = "OLO_PLUGIN_DATA_DIR";

/// Default base directory when the env var is not set, relative to the
/// process working directory.
pub const DEFAULT_BASE_DIR: &str = "olo-data";

static BASE_DIR: OnceLock<RwLock<Option<PathBuf>>> = OnceLock::new();

fn cell() -> &'static RwLock<Option<PathBuf>> {
    BASE_DIR.get_or_init(|| RwLock::new(None))
}

/// Root data directory, resolved from the environment on first use and
/// cached for the process lifetime.
pub fn base_dir() -> PathBuf {
    if let Some(dir) = cell().read().expect("base dir lock poisoned").as_ref() {
        return dir.clone();
    }
    let mut guard = cell().write().expect("base dir lock poisoned");
    if let Some(dir) = guard.as_ref() {
        return dir.clone();
    }
    let resolved = match std::env::var(ENV_PLUGIN_DATA_DIR) {
        Ok(v) if !v.trim().is_empty() => normalize(Path::new(v.trim())),
        _ => PathBuf::from(DEFAULT_BASE_DIR),
    };
    debug!(base = %resolved.display(), "resolved plugin data root");
    *guard = Some(resolved.clone());
    resolved
}

/// Drops the cached root so the next use re-reads the environment.
/// For tests, or when the environment changes at run time.
pub fn reset() {
    *cell().write().expect("base dir lock poisoned") = None;
}

/// Dedicated subfolder for the given plugin id. The id is sanitized, not
/// repaired: traversal attempts are rejected.
pub fn plugin_dir(plugin_id: &str) -> Result<PathBuf> {
    Ok(base_dir().join(sanitize_plugin_id(plugin_id)?))
}

/// Ensures the plugin's data directory exists (creating intermediate
/// directories) and returns it.
pub fn ensure_plugin_dir(plugin_id: &str) -> Result<PathBuf> {
    let dir = plugin_dir(plugin_id)?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Resolves a path relative to the plugin's data directory, for relative
/// config like "uploads" or "templates/response.txt". An empty or "."
/// path resolves to the plugin directory itself; absolute paths and any
/// `..` occurrence are rejected.
pub fn resolve(plugin_id: &str, relative_path: &str) -> Result<PathBuf> {
    let dir = plugin_dir(plugin_id)?;
    let safe = relative_path.replace('\\', "/");
    let safe = safe.trim();
    if safe.is_empty() || safe == "." {
        return Ok(dir);
    }
    if safe.starts_with('/') || Path::new(safe).is_absolute() || safe.contains("..") {
        bail!("relative path must be relative and must not contain '..': {relative_path}");
    }
    Ok(normalize(&dir.join(safe)))
}

fn sanitize_plugin_id(plugin_id: &str) -> Result<String> {
    let s = plugin_id.trim().replace('\\', "/");
    if s.is_empty() {
        bail!("plugin id must be non-blank");
    }
    if s.contains("..") || s.starts_with('/') {
        bail!("plugin id must not contain '..' or start with '/': {plugin_id}");
    }
    Ok(s)
}

/// Lexical cleanup: drops `.` components. `..` never reaches this point.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests mutate the process environment and the cached root; serialize
    // them so parallel execution cannot interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_base_dir<R>(dir: &Path, f: impl FnOnce() -> R) -> R {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var(ENV_PLUGIN_DATA_DIR, dir);
        reset();
        let out = f();
        std::env::remove_var(ENV_PLUGIN_DATA_DIR);
        reset();
        out
    }

    #[test]
    fn default_root_when_env_unset() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var(ENV_PLUGIN_DATA_DIR);
        reset();
        assert_eq!(base_dir(), PathBuf::from(DEFAULT_BASE_DIR));
        reset();
    }

    #[test]
    fn root_is_cached_until_reset() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            let first = base_dir();
            // A changed environment is not observed until reset.
            std::env::set_var(ENV_PLUGIN_DATA_DIR, tmp.path().join("other"));
            assert_eq!(base_dir(), first);
            reset();
            assert_eq!(base_dir(), tmp.path().join("other"));
        });
    }

    #[test]
    fn plugin_dir_is_sandboxed_by_id() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            let dir = plugin_dir("com.openllm.plugin.vectordb").unwrap();
            assert_eq!(dir, tmp.path().join("com.openllm.plugin.vectordb"));
            assert!(plugin_dir("../escape").is_err());
            assert!(plugin_dir("/abs").is_err());
            assert!(plugin_dir("  ").is_err());
            // Backslashes are normalized before the check.
            assert!(plugin_dir("..\\up").is_err());
        });
    }

    #[test]
    fn resolve_rejects_traversal_and_absolute_paths() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            assert!(resolve("p", "..").is_err());
            assert!(resolve("p", "a/../b").is_err());
            assert!(resolve("p", "/abs").is_err());
            assert!(resolve("p", "\\abs").is_err());
        });
    }

    #[test]
    fn empty_and_dot_resolve_to_plugin_dir() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            let base = plugin_dir("p").unwrap();
            assert_eq!(resolve("p", "").unwrap(), base);
            assert_eq!(resolve("p", ".").unwrap(), base);
            assert_eq!(resolve("p", " . ").unwrap(), base);
            assert_eq!(
                resolve("p", "templates/response.txt").unwrap(),
                base.join("templates/response.txt")
            );
            assert_eq!(resolve("p", "./uploads").unwrap(), base.join("uploads"));
        });
    }

    #[test]
    fn resolution_does_not_touch_filesystem_until_ensured() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            let dir = plugin_dir("com.openllm.plugin.rag").unwrap();
            assert!(!dir.exists());
            let created = ensure_plugin_dir("com.openllm.plugin.rag").unwrap();
            assert!(created.is_dir());
            // Idempotent.
            assert_eq!(ensure_plugin_dir("com.openllm.plugin.rag").unwrap(), created);
        });
    }

    #[test]
    fn concurrent_first_use_resolves_one_root() {
        let tmp = tempfile::tempdir().unwrap();
        with_base_dir(tmp.path(), || {
            let handles: Vec<_> = (0..8)
                .map(|_| std::thread::spawn(base_dir))
                .collect();
            let mut roots: Vec<PathBuf> =
                handles.into_iter().map(|h| h.join().unwrap()).collect();
            roots.dedup();
            assert_eq!(roots.len(), 1);
        });
    }
}
