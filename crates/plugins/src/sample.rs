//! Sample plugins used by integration pipelines and as templates: a plain
//! echo stage and a condition stub that always takes branch 0.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor, ScopeRole};

/// Copies the original input into the output and tags it with `_echo`.
pub struct SampleEchoPlugin;

impl SampleEchoPlugin {
    pub const ID: &'static str = "com.openllm.plugin.sample.echo";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Sample Echo".to_string();
        d.description = "Sample plugin that echoes the original input back.".to_string();
        d.outputs = vec![PortDescriptor::typed("_echo", "boolean").describe("Always true")];
        d
    }
}

impl CapabilityHandler for SampleEchoPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let input = ctx.original_input().clone();
        for (k, v) in input {
            ctx.put_output(k, v);
        }
        ctx.put_output("_echo", true);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for SampleEchoPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for SampleEchoPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &[]
    }

    fn planner_description(&self) -> &str {
        "Sample: echoes the original input back as output."
    }
}

impl PluginTypeDescriptor for SampleEchoPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::TOOL
    }
}

/// Condition stub: always selects branch 0. Useful for wiring conditional
/// pipeline shapes before a real predicate exists.
pub struct StubConditionPlugin;

impl StubConditionPlugin {
    pub const ID: &'static str = "com.openllm.plugin.sample.stub.condition";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Stub Condition".to_string();
        d.description = "Condition stub that always selects branch 0.".to_string();
        d.category = plugin_types::CONDITION.to_string();
        d.scope_role = ScopeRole::Condition;
        d.outputs = vec![
            PortDescriptor::typed("branch", "number").describe("Selected branch, always 0"),
            PortDescriptor::typed("conditionStub", "boolean").describe("Always true"),
        ];
        d
    }
}

impl CapabilityHandler for StubConditionPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        ctx.put_output("branch", 0);
        ctx.put_output("conditionStub", true);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for StubConditionPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PluginTypeDescriptor for StubConditionPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::CONDITION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    #[test]
    fn echo_copies_input_and_tags() {
        let input: Map<String, Value> = [
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!("two")),
        ]
        .into_iter()
        .collect();
        let mut ctx = PluginContext::new(input, "test");
        let result = SampleEchoPlugin.execute(&mut ctx);
        assert_eq!(result.data["a"], json!(1));
        assert_eq!(result.data["b"], json!("two"));
        assert_eq!(result.data["_echo"], json!(true));
    }

    #[test]
    fn stub_condition_always_branch_zero() {
        let mut ctx = PluginContext::new(Map::new(), "test");
        let result = StubConditionPlugin.execute(&mut ctx);
        assert_eq!(result.data["branch"], json!(0));
        assert_eq!(result.data["conditionStub"], json!(true));
    }

    #[test]
    fn stub_condition_descriptor_has_condition_role() {
        let d = StubConditionPlugin::descriptor();
        assert_eq!(d.scope_role, ScopeRole::Condition);
    }
}
