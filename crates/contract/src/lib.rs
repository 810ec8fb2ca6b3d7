//! Execution contract between the pipeline scheduler and plugin logic.
//!
//! A scheduler (external to this workspace) builds one [`PluginContext`] per
//! stage invocation, calls the stage's [`CapabilityHandler`] and merges the
//! invocation's current output forward into the accumulated output of later
//! stages. The keyed [`StateStore`] is shared across every invocation of the
//! same pipeline execution; key-space prefixes ("cache:", "memory:")
//! distinguish longer-lived state by convention, not by type.

pub mod capability;
pub mod context;
pub mod state;

pub use capability::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginTypeDescriptor,
};
pub use context::PluginContext;
pub use state::StateStore;

/// Current version of the plugin contract expected by the host.
pub const CONTRACT_VERSION: &str = "0.0.1";
