//! In-memory vector-store stage. Stores tokenized chunks when they are
//! present in the accumulated output, otherwise runs a retrieval for the
//! question. Retrieval is a stub returning no chunks; the store keeps the
//! chunks in the pipeline state under a per-pipeline key.

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::{json, Value};
use tracing::debug;

pub struct VectorStoreRetrievalPlugin;

impl VectorStoreRetrievalPlugin {
    pub const ID: &'static str = "com.openllm.plugin.vectordb";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Vector Store Retrieval".to_string();
        d.description =
            "Stores tokenized chunks when present, otherwise retrieves chunks for the question."
                .to_string();
        d.category = plugin_types::VECTOR_STORE.to_string();
        d.inputs = vec![PortDescriptor::new("question").describe("Query for retrieval mode")];
        d.outputs = vec![
            PortDescriptor::typed("stored", "boolean").describe("True after a store pass"),
            PortDescriptor::typed("chunkCount", "number").describe("Chunks stored"),
            PortDescriptor::typed("retrievedChunks", "array")
                .describe("Chunks retrieved for the question"),
        ];
        d
    }

    fn state_key(pipeline: &str) -> String {
        format!("vectordb:{pipeline}")
    }
}

impl CapabilityHandler for VectorStoreRetrievalPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let chunks = ctx
            .accumulated_output()
            .get("tokenizedChunks")
            .and_then(Value::as_array)
            .filter(|c| !c.is_empty())
            .cloned();
        match chunks {
            Some(chunks) => {
                let count = chunks.len();
                let key = Self::state_key(ctx.pipeline_name());
                ctx.put(key, Value::Array(chunks));
                debug!(count, "stored tokenized chunks");
                ctx.put_output("stored", true);
                ctx.put_output("chunkCount", count);
            }
            None => {
                let question = ctx
                    .input_str("question")
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .map(str::to_string);
                if let Some(question) = question {
                    debug!(question = %question, "retrieval pass");
                    // Stub retrieval: a real store would rank by similarity.
                    ctx.put_output("retrievedChunks", json!([]));
                }
            }
        }
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for VectorStoreRetrievalPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for VectorStoreRetrievalPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question"]
    }

    fn planner_description(&self) -> &str {
        "Vector store: stores tokenized chunks or retrieves chunks for a question."
    }
}

impl PluginTypeDescriptor for VectorStoreRetrievalPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::VECTOR_STORE
    }
}
