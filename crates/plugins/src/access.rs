//! Access-control stage that allows everything unless the input explicitly
//! carries an `allowKey` that is not `true`.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::Value;

pub struct AllowAllAccessControlPlugin;

impl AllowAllAccessControlPlugin {
    pub const ID: &'static str = "com.openllm.plugin.access.allowall";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Allow-All Access Control".to_string();
        d.description =
            "Access control stage that allows all requests unless allowKey is set and not true."
                .to_string();
        d.category = plugin_types::ACCESS_CONTROL.to_string();
        d.inputs = vec![PortDescriptor::typed("allowKey", "string")
            .describe("Optional; deny when present and not true")];
        d.outputs = vec![
            PortDescriptor::typed("accessAllowed", "boolean").describe("True when allowed"),
            PortDescriptor::typed("accessDenied", "boolean").describe("True when denied"),
            PortDescriptor::new("reason").describe("Denial reason"),
        ];
        d
    }

    fn is_allowed(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => false,
        }
    }
}

impl CapabilityHandler for AllowAllAccessControlPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let denied = ctx
            .original_input()
            .get("allowKey")
            .map(|v| !Self::is_allowed(v))
            .unwrap_or(false);
        if denied {
            ctx.put_output("accessDenied", true);
            ctx.put_output("reason", "allowKey not set or not true");
        } else {
            ctx.put_output("accessAllowed", true);
        }
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for AllowAllAccessControlPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for AllowAllAccessControlPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["allowKey"]
    }

    fn planner_description(&self) -> &str {
        "Access control: allows all requests unless allowKey is present and not true."
    }
}

impl PluginTypeDescriptor for AllowAllAccessControlPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::ACCESS_CONTROL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn run(pairs: &[(&str, Value)]) -> CapabilityResult {
        let input: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let mut ctx = PluginContext::new(input, "test");
        AllowAllAccessControlPlugin.execute(&mut ctx)
    }

    #[test]
    fn absent_key_allows() {
        let result = run(&[]);
        assert_eq!(result.data["accessAllowed"], json!(true));
        assert!(!result.data.contains_key("accessDenied"));
    }

    #[test]
    fn true_values_allow() {
        for v in [json!(true), json!("true")] {
            let result = run(&[("allowKey", v)]);
            assert_eq!(result.data["accessAllowed"], json!(true));
        }
    }

    #[test]
    fn other_values_deny_with_reason() {
        let result = run(&[("allowKey", json!("no"))]);
        assert_eq!(result.data["accessDenied"], json!(true));
        assert_eq!(result.data["reason"], json!("allowKey not set or not true"));
        assert!(!result.data.contains_key("accessAllowed"));
    }
}
