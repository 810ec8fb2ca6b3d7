//! Command handlers for the `olo` binary. `main` parses arguments and
//! delegates here; each handler returns `anyhow::Result` so failures surface
//! with context instead of panics.

pub mod args;
pub mod datadir;
pub mod manifest;
