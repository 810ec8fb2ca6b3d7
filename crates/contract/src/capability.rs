//! Capability traits a plugin unit may implement.
//!
//! The four descriptor-facing behaviors are independent: a minimal stub only
//! needs [`CapabilityHandler`]; contract-version compatibility, planner
//! input description and the plugin-type tag are separate opt-in traits
//! rather than a mandatory base.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::PluginContext;

/// Core execution behavior of a pipeline stage.
///
/// `execute` never fails past the contract: run-time problems inside a
/// plugin are reported in its own output fields (an `error` key by
/// convention) so the scheduler can keep the pipeline going.
pub trait CapabilityHandler: Send + Sync {
    /// Stable capability name, by convention the plugin id.
    fn name(&self) -> &str;

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult;
}

/// Declares which contract version the plugin was built against.
pub trait ContractCompatibility {
    fn required_contract_version(&self) -> &str;
}

/// Describes the plugin to a planner that filters available tools.
pub trait PlannerInputDescriptor {
    /// Input field names the planner should supply or route.
    fn required_input_fields(&self) -> &'static [&'static str];

    /// Short human-readable capability description.
    fn planner_description(&self) -> &str;
}

/// Tags the plugin with one of the [`plugin_types`] constants.
pub trait PluginTypeDescriptor {
    fn plugin_type(&self) -> &str;
}

/// Structured result of one invocation: the capability name plus a
/// defensive copy of the invocation's current output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CapabilityResult {
    pub capability_name: String,
    pub data: Map<String, Value>,
}

impl CapabilityResult {
    pub fn from_context(name: impl Into<String>, ctx: &PluginContext) -> Self {
        Self {
            capability_name: name.into(),
            data: ctx.current_output().clone(),
        }
    }
}

/// Plugin type vocabulary used for palette grouping and planner filtering.
pub mod plugin_types {
    pub const ACCESS_CONTROL: &str = "ACCESS_CONTROL";
    pub const CACHING: &str = "CACHING";
    pub const CONDITION: &str = "CONDITION";
    pub const FILTER: &str = "FILTER";
    pub const GUARDRAIL: &str = "GUARDRAIL";
    pub const MEMORY: &str = "MEMORY";
    pub const MODEL: &str = "MODEL";
    pub const OBSERVABILITY: &str = "OBSERVABILITY";
    pub const PROMPT_BUILDER: &str = "PROMPT_BUILDER";
    pub const REFINEMENT: &str = "REFINEMENT";
    pub const TOOL: &str = "TOOL";
    pub const VECTOR_STORE: &str = "VECTOR_STORE";
}
