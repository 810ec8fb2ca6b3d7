//! Simple guardrail: optional max-length truncation and blocklist redaction.
//! Blocklist matching runs against the full pre-truncation content; the
//! redaction itself is applied to whatever survives truncation.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use regex::RegexBuilder;
use serde_json::Value;
use tracing::warn;

use crate::util::{env_or, env_usize, value_to_string};

const DEFAULT_MAX_LENGTH: usize = 10_000;
const ENV_MAX_LENGTH: &str = "GUARDRAIL_MAX_LENGTH";
const ENV_BLOCKLIST: &str = "GUARDRAIL_BLOCKLIST_WORDS";
const REDACTED: &str = "[REDACTED]";

pub struct SimpleGuardrailPlugin;

impl SimpleGuardrailPlugin {
    pub const ID: &'static str = "com.openllm.plugin.guardrail.simple";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Simple Guardrail".to_string();
        d.description =
            "Optional max length and blocklist; sets guardrailTriggered and filteredContent when triggered."
                .to_string();
        d.category = plugin_types::GUARDRAIL.to_string();
        d.inputs = vec![
            PortDescriptor::new("question").describe("Content to check"),
            PortDescriptor::typed("maxLength", "integer").describe("Max allowed length"),
            PortDescriptor::new("blocklistWords").describe("Comma-separated blocked terms"),
        ];
        d.outputs = vec![
            PortDescriptor::typed("guardrailTriggered", "boolean")
                .describe("True if guardrail fired"),
            PortDescriptor::new("filteredContent").describe("Filtered content when triggered"),
        ];
        d
    }

    fn content_of(ctx: &PluginContext) -> String {
        if let Some(q) = ctx.original_input().get("question") {
            return value_to_string(q);
        }
        if let Some(r) = ctx.accumulated_output().get("result") {
            return value_to_string(r);
        }
        String::new()
    }

    fn max_length(ctx: &PluginContext) -> usize {
        let default_max = env_usize(ENV_MAX_LENGTH, DEFAULT_MAX_LENGTH);
        match ctx.original_input().get("maxLength").and_then(Value::as_u64) {
            Some(n) if n > 0 => n as usize,
            _ => default_max,
        }
    }

    fn blocklist(ctx: &PluginContext) -> String {
        match ctx.input_str("blocklistWords") {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => env_or(ENV_BLOCKLIST, ""),
        }
    }
}

impl CapabilityHandler for SimpleGuardrailPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let content = Self::content_of(ctx);
        let max_len = Self::max_length(ctx);

        let mut triggered = false;
        let mut filtered = content.clone();
        if content.chars().count() > max_len {
            triggered = true;
            filtered = content.chars().take(max_len).collect();
        }

        let blocklist = Self::blocklist(ctx);
        let lower = content.to_lowercase();
        for word in blocklist.split(',') {
            let word = word.trim();
            if word.is_empty() || !lower.contains(&word.to_lowercase()) {
                continue;
            }
            triggered = true;
            match RegexBuilder::new(&regex::escape(word))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => filtered = re.replace_all(&filtered, REDACTED).into_owned(),
                Err(err) => warn!(word, %err, "blocklist term did not compile"),
            }
        }

        ctx.put_output("guardrailTriggered", triggered);
        ctx.put_output("filteredContent", filtered);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for SimpleGuardrailPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for SimpleGuardrailPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question", "result", "maxLength", "blocklistWords"]
    }

    fn planner_description(&self) -> &str {
        "Guardrail: max length and optional blocklist; sets guardrailTriggered and filteredContent."
    }
}

impl PluginTypeDescriptor for SimpleGuardrailPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::GUARDRAIL
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
        SimpleGuardrailPlugin.execute(&mut ctx)
    }

    #[test]
    fn clean_content_passes_through() {
        let result = run(&[("question", json!("hello world"))]);
        assert_eq!(result.data["guardrailTriggered"], json!(false));
        assert_eq!(result.data["filteredContent"], json!("hello world"));
    }

    #[test]
    fn over_length_content_is_truncated() {
        let result = run(&[("question", json!("abcdefghij")), ("maxLength", json!(4))]);
        assert_eq!(result.data["guardrailTriggered"], json!(true));
        assert_eq!(result.data["filteredContent"], json!("abcd"));
    }

    #[test]
    fn blocklist_terms_are_redacted_case_insensitively() {
        let result = run(&[
            ("question", json!("This contains a Secret word")),
            ("blocklistWords", json!("secret, other")),
        ]);
        assert_eq!(result.data["guardrailTriggered"], json!(true));
        assert_eq!(
            result.data["filteredContent"],
            json!("This contains a [REDACTED] word")
        );
    }

    #[test]
    fn blocklist_term_beyond_truncation_still_triggers() {
        // The term sits past the cut, so detection fires on the full content
        // while the surviving text has nothing to redact.
        let result = run(&[
            ("question", json!("clean text then secret")),
            ("maxLength", json!(10)),
            ("blocklistWords", json!("secret")),
        ]);
        assert_eq!(result.data["guardrailTriggered"], json!(true));
        assert_eq!(result.data["filteredContent"], json!("clean text"));
    }

    #[test]
    fn falls_back_to_accumulated_result() {
        let mut ctx = PluginContext::new(Map::new(), "test");
        ctx.merge_accumulated(
            [("result".to_string(), json!("from upstream"))]
                .into_iter()
                .collect(),
        );
        let result = SimpleGuardrailPlugin.execute(&mut ctx);
        assert_eq!(result.data["filteredContent"], json!("from upstream"));
    }

    #[test]
    fn regex_metacharacters_in_blocklist_are_literal() {
        let result = run(&[
            ("question", json!("call f(x) now")),
            ("blocklistWords", json!("f(x)")),
        ]);
        assert_eq!(result.data["filteredContent"], json!("call [REDACTED] now"));
    }
}
