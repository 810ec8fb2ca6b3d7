//! Chat and RAG model plugins calling Ollama's /api/generate endpoint, plus
//! fixed-model variants for the query-all-models fan-out pipeline. Transport
//! failures are reported inline in the response text so a pipeline keeps
//! running when the model server is down.

use std::time::Duration;

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{PluginDescriptor, PortDescriptor};
use serde_json::{json, Map, Value};
use tracing::debug;

use super::resolver;
use crate::util::{env_or, value_to_string};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";
const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";

fn base_url() -> String {
    env_or(ENV_BASE_URL, DEFAULT_BASE_URL)
}

/// Single non-streaming generate call. Blank prompts short-circuit to an
/// empty response without touching the network.
fn generate(base: &str, prompt: &str, model_id: &str) -> String {
    if prompt.trim().is_empty() {
        return String::new();
    }
    let client = match reqwest::blocking::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(resolver::ollama_timeout_seconds()))
        .build()
    {
        Ok(c) => c,
        Err(err) => return format!("Error calling Ollama: {err}"),
    };
    debug!(model = model_id, "ollama generate");
    let response = client
        .post(format!("{base}/api/generate"))
        .json(&json!({ "model": model_id, "prompt": prompt, "stream": false }))
        .send();
    match response {
        Ok(resp) => {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            if status != reqwest::StatusCode::OK {
                return format!("Error: Ollama returned {} - {body}", status.as_u16());
            }
            serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|root| root.get("response").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_default()
        }
        Err(err) => format!("Error calling Ollama: {err}"),
    }
}

/// When input has "messages" (chat UI) but no "question", the last user
/// message content is the question.
fn derive_question(input: &Map<String, Value>) -> String {
    if let Some(q) = input.get("question").and_then(Value::as_str) {
        if !q.trim().is_empty() {
            return q.to_string();
        }
    }
    let Some(messages) = input.get("messages").and_then(Value::as_array) else {
        return String::new();
    };
    for message in messages.iter().rev() {
        let Some(msg) = message.as_object() else {
            continue;
        };
        if msg.get("role").and_then(Value::as_str) == Some("user") {
            return msg
                .get("content")
                .map(value_to_string)
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
        }
    }
    String::new()
}

fn rag_prompt(question: &str, chunks: Option<&Vec<Value>>) -> String {
    let mut prompt = String::new();
    if let Some(chunks) = chunks.filter(|c| !c.is_empty()) {
        prompt.push_str("Use the following context to answer the question.\n\nContext:\n");
        for chunk in chunks {
            let text = chunk
                .get("text")
                .or_else(|| chunk.get("content"))
                .map(value_to_string);
            if let Some(text) = text {
                prompt.push_str(&text);
                prompt.push('\n');
            }
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!("Question: {question}\n\nAnswer:"));
    prompt
}

/// Chat LLM via Ollama (no RAG). Any model: input.modelId or pipeline name
/// such as "chat-mistral".
pub struct OllamaChatPlugin;

impl OllamaChatPlugin {
    pub const ID: &'static str = "com.openllm.plugin.llm.ollama";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Ollama Chat".to_string();
        d.description =
            "Chat LLM via Ollama; supports any model. Input: messages or question. Env: OLLAMA_BASE_URL, OLLAMA_MODEL."
                .to_string();
        d.category = plugin_types::MODEL.to_string();
        d.inputs = vec![
            PortDescriptor::typed("messages", "array").describe("Chat messages array"),
            PortDescriptor::new("question").describe("Single question string"),
            PortDescriptor::new("modelId").describe("Ollama model id"),
        ];
        d.outputs = vec![
            PortDescriptor::new("result").describe("Model response text"),
            PortDescriptor::new("response").describe("Alias for result"),
        ];
        d
    }
}

impl CapabilityHandler for OllamaChatPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let question = derive_question(ctx.original_input());
        let model_id = resolver::resolve_model_id(ctx);
        let response = generate(&base_url(), &question, &model_id);
        ctx.put_output("response", response.clone());
        ctx.put_output("result", response);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for OllamaChatPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for OllamaChatPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question", "messages", "modelId"]
    }

    fn planner_description(&self) -> &str {
        "Model: chat via Ollama; needs question or messages."
    }
}

impl PluginTypeDescriptor for OllamaChatPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::MODEL
    }
}

/// RAG LLM via Ollama: folds accumulated retrievedChunks into the prompt.
pub struct OllamaRagPlugin;

impl OllamaRagPlugin {
    pub const ID: &'static str = "com.openllm.plugin.llm.ollama.rag";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Ollama RAG".to_string();
        d.description =
            "RAG LLM via Ollama; uses retrievedChunks for context. Input: question or messages; optional modelId. Env: OLLAMA_BASE_URL, OLLAMA_MODEL."
                .to_string();
        d.category = plugin_types::MODEL.to_string();
        d.inputs = vec![
            PortDescriptor::new("question").describe("User question"),
            PortDescriptor::typed("messages", "array").describe("Chat messages"),
            PortDescriptor::new("modelId").describe("Ollama model id"),
        ];
        d.outputs = vec![
            PortDescriptor::new("result").describe("Model response"),
            PortDescriptor::new("response").describe("Alias for result"),
        ];
        d
    }
}

impl CapabilityHandler for OllamaRagPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let question = derive_question(ctx.original_input());
        let chunks = ctx
            .accumulated_output()
            .get("retrievedChunks")
            .and_then(Value::as_array)
            .cloned();
        let model_id = resolver::resolve_model_id(ctx);
        let response = if question.trim().is_empty() {
            String::new()
        } else {
            generate(&base_url(), &rag_prompt(&question, chunks.as_ref()), &model_id)
        };
        ctx.put_output("response", response.clone());
        ctx.put_output("result", response);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for OllamaRagPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for OllamaRagPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question", "messages", "modelId", "retrievedChunks"]
    }

    fn planner_description(&self) -> &str {
        "Model: RAG/completion via Ollama; needs question or messages, optional modelId and retrievedChunks."
    }
}

impl PluginTypeDescriptor for OllamaRagPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::MODEL
    }
}

/// Chat plugin pinned to one Ollama model. Used in the query-all-models
/// fan-out pipeline so each stage has one model; outputs modelLabel for the
/// merge stage.
pub struct FixedModelChatPlugin {
    id: &'static str,
    display_name: &'static str,
    model_id: &'static str,
    model_label: &'static str,
}

impl FixedModelChatPlugin {
    pub fn llama32() -> Self {
        Self {
            id: "com.openllm.plugin.llm.ollama.llama32fixed",
            display_name: "Llama 3.2 Fixed Chat",
            model_id: "llama3.2:latest",
            model_label: "llama3.2",
        }
    }

    pub fn phi3() -> Self {
        Self {
            id: "com.openllm.plugin.llm.phi3",
            display_name: "Phi-3 Chat",
            model_id: "phi3:latest",
            model_label: "phi3",
        }
    }

    pub fn qwen2() -> Self {
        Self {
            id: "com.openllm.plugin.llm.qwen2",
            display_name: "Qwen2 Chat",
            model_id: "qwen2:1.5b",
            model_label: "qwen2:1.5b",
        }
    }

    pub fn descriptor(&self) -> PluginDescriptor {
        let mut d = PluginDescriptor::new(self.id, std::any::type_name::<Self>());
        d.name = self.display_name.to_string();
        d.description = format!(
            "Chat via Ollama pinned to {}; outputs modelLabel for merge stages.",
            self.model_id
        );
        d.category = plugin_types::MODEL.to_string();
        d.inputs = vec![
            PortDescriptor::typed("messages", "array").describe("Chat messages array"),
            PortDescriptor::new("question").describe("Single question string"),
        ];
        d.outputs = vec![
            PortDescriptor::new("result").describe("Model response text"),
            PortDescriptor::new("response").describe("Alias for result"),
            PortDescriptor::new("modelLabel").describe("Fixed model label"),
        ];
        d
    }
}

impl CapabilityHandler for FixedModelChatPlugin {
    fn name(&self) -> &str {
        self.id
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let question = derive_question(ctx.original_input());
        let response = generate(&base_url(), &question, self.model_id);
        ctx.put_output("response", response.clone());
        ctx.put_output("result", response);
        ctx.put_output("modelLabel", self.model_label);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for FixedModelChatPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for FixedModelChatPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["question", "messages", "modelId"]
    }

    fn planner_description(&self) -> &str {
        "Model: chat via Ollama (fixed model); needs question or messages."
    }
}

impl PluginTypeDescriptor for FixedModelChatPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::MODEL
    }
}
