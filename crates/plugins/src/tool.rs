//! Echo tool: returns its tool input as result. For testing pipelines or as
//! a template for real tool plugins.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};

use crate::util::value_to_string;

pub struct EchoToolPlugin;

impl EchoToolPlugin {
    pub const ID: &'static str = "com.openllm.plugin.tool.echo";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Echo Tool".to_string();
        d.description =
            "Echo tool: returns tool input as result; for testing or as template.".to_string();
        d.category = plugin_types::TOOL.to_string();
        d.inputs = vec![
            PortDescriptor::typed("toolName", "string").describe("Tool name (default echo)"),
            PortDescriptor::typed("toolInput", "object").describe("Input to echo"),
            PortDescriptor::typed("question", "string").describe("Alternative input"),
        ];
        d.outputs = vec![
            PortDescriptor::new("toolResult").describe("Echoed result"),
            PortDescriptor::new("toolName").describe("Tool name used"),
        ];
        d.sample_input =
            "{\"toolName\":\"echo\",\"toolInput\":\"Hello from validation\"}".to_string();
        d.sample_input_description =
            "Provide toolName (optional) and toolInput or question to echo back.".to_string();
        d
    }
}

impl CapabilityHandler for EchoToolPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let tool_name = match ctx.input_str("toolName") {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => "echo".to_string(),
        };
        let tool_input = ctx
            .original_input()
            .get("toolInput")
            .or_else(|| ctx.original_input().get("question"));
        let result = tool_input.map(value_to_string).unwrap_or_default();
        ctx.put_output("toolResult", result);
        ctx.put_output("toolName", tool_name);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for EchoToolPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for EchoToolPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["toolName", "toolInput", "question"]
    }

    fn planner_description(&self) -> &str {
        "Tool: echo tool input as result; for testing or as template."
    }
}

impl PluginTypeDescriptor for EchoToolPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::TOOL
    }
}
