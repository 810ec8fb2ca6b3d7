//! In-memory caching stage. Entries live under a `cache:` key prefix in both
//! the pipeline state and a process-wide shared cache, so a value cached in
//! one pipeline run is visible to the next.

use std::sync::Arc;

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, StateStore, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::Value;
use tracing::debug;

const KEY_PREFIX: &str = "cache:";

pub struct InMemoryCachingPlugin {
    shared: Arc<StateStore>,
}

impl InMemoryCachingPlugin {
    pub const ID: &'static str = "com.openllm.plugin.caching.memory";

    pub fn new(shared: Arc<StateStore>) -> Self {
        Self { shared }
    }

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "In-Memory Caching".to_string();
        d.description =
            "Caches values under cacheKey in a process-wide in-memory store.".to_string();
        d.category = plugin_types::CACHING.to_string();
        d.inputs = vec![
            PortDescriptor::typed("cacheKey", "string")
                .required()
                .describe("Key for the cache entry"),
            PortDescriptor::typed("value", "object")
                .describe("Value to cache; omit to look up"),
        ];
        d.outputs = vec![
            PortDescriptor::typed("cacheHit", "boolean").describe("True when a lookup found a value"),
            PortDescriptor::new("cachedValue").describe("Retrieved or stored value"),
        ];
        d
    }
}

impl CapabilityHandler for InMemoryCachingPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let key = match ctx.input_str("cacheKey") {
            Some(k) if !k.trim().is_empty() => format!("{KEY_PREFIX}{}", k.trim()),
            _ => {
                ctx.put_output("error", "cacheKey is required");
                return CapabilityResult::from_context(self.name(), ctx);
            }
        };
        let mut hit = false;
        match ctx.original_input().get("value").cloned() {
            Some(value) if !value.is_null() => {
                debug!(key = %key, "cache store");
                self.shared.put(key.clone(), value.clone());
                ctx.put(key, value.clone());
                ctx.put_output("cachedValue", value);
            }
            _ => {
                let cached = ctx.get(&key).or_else(|| self.shared.get(&key));
                hit = cached.is_some();
                ctx.put_output("cachedValue", cached.unwrap_or(Value::Null));
            }
        }
        ctx.put_output("cacheHit", hit);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for InMemoryCachingPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for InMemoryCachingPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["cacheKey", "value"]
    }

    fn planner_description(&self) -> &str {
        "Caching: in-memory get/set by cacheKey; outputs cachedValue, cacheHit."
    }
}

impl PluginTypeDescriptor for InMemoryCachingPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::CACHING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn ctx_with(pairs: &[(&str, Value)]) -> PluginContext {
        let input: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        PluginContext::new(input, "test")
    }

    #[test]
    fn store_is_visible_across_pipeline_runs() {
        let shared = Arc::new(StateStore::new());
        let plugin = InMemoryCachingPlugin::new(Arc::clone(&shared));

        let mut store = ctx_with(&[("cacheKey", json!("q1")), ("value", json!("answer"))]);
        let result = plugin.execute(&mut store);
        assert_eq!(result.data["cachedValue"], json!("answer"));
        assert_eq!(result.data["cacheHit"], json!(false));

        // Fresh context, same shared cache.
        let mut lookup = ctx_with(&[("cacheKey", json!("q1"))]);
        let result = plugin.execute(&mut lookup);
        assert_eq!(result.data["cacheHit"], json!(true));
        assert_eq!(result.data["cachedValue"], json!("answer"));
    }

    #[test]
    fn miss_reports_cache_hit_false_with_null_value() {
        let plugin = InMemoryCachingPlugin::new(Arc::new(StateStore::new()));
        let mut ctx = ctx_with(&[("cacheKey", json!("nope"))]);
        let result = plugin.execute(&mut ctx);
        assert_eq!(result.data["cacheHit"], json!(false));
        assert_eq!(result.data["cachedValue"], Value::Null);
    }

    #[test]
    fn missing_key_is_an_inline_error() {
        let plugin = InMemoryCachingPlugin::new(Arc::new(StateStore::new()));
        let mut ctx = ctx_with(&[("value", json!("x"))]);
        let result = plugin.execute(&mut ctx);
        assert_eq!(result.data["error"], json!("cacheKey is required"));
    }

    #[test]
    fn store_under_the_value_key_writes_pipeline_state_too() {
        let plugin = InMemoryCachingPlugin::new(Arc::new(StateStore::new()));
        let mut ctx = ctx_with(&[("cacheKey", json!("k")), ("value", json!(7))]);
        let result = plugin.execute(&mut ctx);
        assert_eq!(ctx.get("cache:k"), Some(json!(7)));
        assert!(!result.data.contains_key("cached"));
    }
}
