//! Context memory stage backed by the pipeline state store. Reads or writes
//! values under a `memory:` key prefix so memory entries never collide with
//! cache entries sharing the same store.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::Value;

const KEY_PREFIX: &str = "memory:";

pub struct ContextMemoryPlugin;

impl ContextMemoryPlugin {
    pub const ID: &'static str = "com.openllm.plugin.memory.context";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Context Memory".to_string();
        d.description =
            "Reads or writes pipeline memory entries keyed by memoryKey.".to_string();
        d.category = plugin_types::MEMORY.to_string();
        d.inputs = vec![
            PortDescriptor::typed("memoryKey", "string")
                .required()
                .describe("Key for the memory entry"),
            PortDescriptor::typed("memoryValue", "object")
                .describe("Value to store; omit to read"),
        ];
        d.outputs = vec![
            PortDescriptor::typed("memoryHit", "boolean").describe("True when a read found a value"),
            PortDescriptor::new("memoryValue").describe("Retrieved or written value"),
            PortDescriptor::typed("written", "boolean").describe("True after a write"),
        ];
        d
    }
}

impl CapabilityHandler for ContextMemoryPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let key = match ctx.input_str("memoryKey") {
            Some(k) if !k.trim().is_empty() => format!("{KEY_PREFIX}{}", k.trim()),
            _ => {
                ctx.put_output("error", "memoryKey is required");
                return CapabilityResult::from_context(self.name(), ctx);
            }
        };
        let mut hit = false;
        match ctx.original_input().get("memoryValue").cloned() {
            Some(value) if !value.is_null() => {
                ctx.put(key, value.clone());
                ctx.put_output("memoryValue", value);
                ctx.put_output("written", true);
            }
            _ => {
                let read = ctx.get(&key);
                hit = read.is_some();
                ctx.put_output("memoryValue", read.unwrap_or(Value::Null));
            }
        }
        ctx.put_output("memoryHit", hit);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for ContextMemoryPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for ContextMemoryPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["memoryKey", "memoryValue"]
    }

    fn planner_description(&self) -> &str {
        "Memory: reads or writes pipeline memory entries keyed by memoryKey."
    }
}

impl PluginTypeDescriptor for ContextMemoryPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::MEMORY
    }
}
