//! Prompt builder filling `{question}`, `{context}` and `{result}`
//! placeholders in a template.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};

use crate::util::value_to_string;

const DEFAULT_TEMPLATE: &str = "Question: {question}\n\nContext:\n{context}";

pub struct SimplePromptBuilderPlugin;

impl SimplePromptBuilderPlugin {
    pub const ID: &'static str = "com.openllm.plugin.prompt.simple";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Simple Prompt Builder".to_string();
        d.description =
            "Builds prompt from template with {question}, {context}, {result} placeholders."
                .to_string();
        d.category = plugin_types::PROMPT_BUILDER.to_string();
        d.inputs = vec![
            PortDescriptor::new("question").describe("User question"),
            PortDescriptor::new("template").describe("Prompt template"),
            PortDescriptor::new("context").describe("Context text"),
            PortDescriptor::typed("retrievedChunks", "array")
                .describe("Retrieved chunks for context"),
        ];
        d.outputs =
            vec![PortDescriptor::new("builtPrompt").describe("Built prompt string")];
        d
    }
}

impl CapabilityHandler for SimplePromptBuilderPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let question = ctx
            .input_str("question")
            .map(str::to_string)
            .or_else(|| {
                ctx.accumulated_output()
                    .get("question")
                    .map(value_to_string)
            })
            .unwrap_or_default();
        let context_str = ctx
            .accumulated_output()
            .get("retrievedChunks")
            .or_else(|| ctx.accumulated_output().get("context"))
            .map(value_to_string)
            .unwrap_or_default();
        let result_val = ctx
            .accumulated_output()
            .get("result")
            .map(value_to_string)
            .unwrap_or_default();
        let template = match ctx.input_str("template") {
            Some(t) if !t.trim().is_empty() => t.to_string(),
            _ => DEFAULT_TEMPLATE.to_string(),
        };
        let built = template
            .replace("{question}", &question)
            .replace("{context}", &context_str)
            .replace("{result}", &result_val);
        ctx.put_output("builtPrompt", built);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for SimplePromptBuilderPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for SimplePromptBuilderPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question", "context", "template", "retrievedChunks"]
    }

    fn planner_description(&self) -> &str {
        "Prompt builder: template with question, context, result placeholders."
    }
}

impl PluginTypeDescriptor for SimplePromptBuilderPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::PROMPT_BUILDER
    }
}
