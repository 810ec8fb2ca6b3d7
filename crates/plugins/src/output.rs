//! Answer-format stage: renders the model output as a single line
//! `ANS: "<response>"`. The prefix can come from a template file in the
//! plugin data dir, the `ANSWER_FORMAT_PREFIX` env var, or the default.

use std::fs;

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{data_paths, PluginDescriptor, PortDescriptor};

use crate::util::{env_or, value_to_string};

const PREFIX: &str = "ANS: \"";
const TEMPLATE_RELATIVE_PATH: &str = "templates/prefix.txt";
const ENV_PREFIX: &str = "ANSWER_FORMAT_PREFIX";

pub struct AnswerFormatPlugin;

impl AnswerFormatPlugin {
    pub const ID: &'static str = "com.openllm.plugin.output.answerformat";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Answer Format".to_string();
        d.description =
            "Renders model output as ANS: \"<response>\"; reads result or response from accumulated output."
                .to_string();
        d.category = plugin_types::REFINEMENT.to_string();
        d.outputs =
            vec![PortDescriptor::new("output").describe("Formatted answer line")];
        d
    }

    /// Prefix resolution: template file in the plugin data dir, then env,
    /// then the built-in default.
    fn resolve_prefix() -> String {
        if let Ok(path) = data_paths::resolve(Self::ID, TEMPLATE_RELATIVE_PATH) {
            if path.is_file() {
                if let Ok(from_file) = fs::read_to_string(&path) {
                    let trimmed = from_file.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }
        env_or(ENV_PREFIX, PREFIX)
    }

    fn escape_quotes(s: &str) -> String {
        s.replace('\\', "\\\\").replace('"', "\\\"")
    }
}

impl CapabilityHandler for AnswerFormatPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let accumulated = ctx.accumulated_output();
        let text = accumulated
            .get("result")
            .map(value_to_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| {
                accumulated
                    .get("response")
                    .map(value_to_string)
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_default();
        let formatted = format!("{}{}\"", Self::resolve_prefix(), Self::escape_quotes(&text));
        ctx.put_output("output", formatted);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for AnswerFormatPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for AnswerFormatPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["result", "response"]
    }

    fn planner_description(&self) -> &str {
        "Refinement: format result/response as ANS: \"...\"."
    }
}

impl PluginTypeDescriptor for AnswerFormatPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::REFINEMENT
    }
}
