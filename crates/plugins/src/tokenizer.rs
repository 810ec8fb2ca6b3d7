//! Document tokenizer producing a single-chunk token list from the content
//! input. A real deployment would swap this for a sentence or sliding-window
//! splitter; downstream stages only rely on the chunk shape.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::{json, Value};

pub struct DocumentTokenizerPlugin;

impl DocumentTokenizerPlugin {
    pub const ID: &'static str = "com.openllm.plugin.tokenizer.document";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Document Tokenizer".to_string();
        d.description =
            "Splits document content into tokenized chunks for vector storage.".to_string();
        d.category = plugin_types::FILTER.to_string();
        d.inputs = vec![PortDescriptor::new("content").describe("Document content to tokenize")];
        d.outputs = vec![PortDescriptor::typed("tokenizedChunks", "array")
            .describe("Chunks with text and index")];
        d
    }
}

impl CapabilityHandler for DocumentTokenizerPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let content = ctx.input_str("content").unwrap_or("").to_string();
        let chunks: Vec<Value> = if content.trim().is_empty() {
            Vec::new()
        } else {
            vec![json!({ "text": content, "index": 0 })]
        };
        ctx.put_output("tokenizedChunks", Value::Array(chunks));
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for DocumentTokenizerPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for DocumentTokenizerPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["content"]
    }

    fn planner_description(&self) -> &str {
        "Tokenizer: splits document content into tokenized chunks."
    }
}

impl PluginTypeDescriptor for DocumentTokenizerPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::FILTER
    }
}
