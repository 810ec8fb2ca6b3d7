//! Pass-through observability stage: marks the context as observed and
//! forwards the interesting accumulated fields unchanged.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use tracing::debug;

pub struct PassThroughObservabilityPlugin;

impl PassThroughObservabilityPlugin {
    pub const ID: &'static str = "com.openllm.plugin.observability.passthrough";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Pass-Through Observability".to_string();
        d.description =
            "Observability stage that records the pass and forwards result and question."
                .to_string();
        d.category = plugin_types::OBSERVABILITY.to_string();
        d.outputs = vec![
            PortDescriptor::typed("observed", "boolean").describe("Always true"),
            PortDescriptor::new("result").describe("Forwarded result, when present"),
            PortDescriptor::new("question").describe("Forwarded question, when present"),
        ];
        d
    }
}

impl CapabilityHandler for PassThroughObservabilityPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        debug!(pipeline = %ctx.pipeline_name(), "observability pass");
        ctx.put_output("observed", true);
        for key in ["result", "question"] {
            if let Some(v) = ctx.accumulated_output().get(key).cloned() {
                ctx.put_output(key, v);
            }
        }
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for PassThroughObservabilityPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for PassThroughObservabilityPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &[]
    }

    fn planner_description(&self) -> &str {
        "Observability: pass-through stage that records observed=true and forwards fields."
    }
}

impl PluginTypeDescriptor for PassThroughObservabilityPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::OBSERVABILITY
    }
}
