//! Resolves the Ollama model id from (1) input.modelId, (2) the pipeline
//! name (rag-X / chat-X), (3) env OLLAMA_MODEL. Pipeline names like
//! "rag-mistral" or "chat-gemma2-2b" pick the model for that pipeline.

use contract::PluginContext;

use crate::util::{env_or, env_usize};

const DEFAULT_MODEL: &str = "llama3.2:latest";
const ENV_MODEL: &str = "OLLAMA_MODEL";
const ENV_TIMEOUT: &str = "OLLAMA_TIMEOUT_SECONDS";
// Generous default so parallel multi-model pipelines do not time out.
const DEFAULT_TIMEOUT_SECONDS: usize = 300;

/// Model id resolution: input.modelId > pipeline name (rag-X / chat-X) >
/// OLLAMA_MODEL.
pub fn resolve_model_id(ctx: &PluginContext) -> String {
    if let Some(model_id) = ctx.input_str("modelId") {
        let trimmed = model_id.trim();
        if !trimmed.is_empty() {
            return to_ollama_model_tag(trimmed);
        }
    }
    if let Some(from_pipeline) = model_id_from_pipeline_name(ctx.pipeline_name().trim()) {
        return from_pipeline;
    }
    env_or(ENV_MODEL, DEFAULT_MODEL)
}

/// Timeout in seconds for each Ollama HTTP request (env OLLAMA_TIMEOUT_SECONDS).
pub fn ollama_timeout_seconds() -> u64 {
    env_usize(ENV_TIMEOUT, DEFAULT_TIMEOUT_SECONDS) as u64
}

fn model_id_from_pipeline_name(pipeline_name: &str) -> Option<String> {
    let suffix = pipeline_name
        .strip_prefix("rag-")
        .or_else(|| pipeline_name.strip_prefix("chat-"))?
        .trim();
    if suffix.is_empty() {
        return None;
    }
    Some(to_ollama_model_tag(suffix))
}

/// Maps pipeline-friendly tags to exact Ollama model names (as returned by
/// `ollama list`). Keys already carrying a tag pass through unchanged.
fn to_ollama_model_tag(model_key: &str) -> String {
    if model_key.contains(':') {
        return model_key.to_string();
    }
    match model_key {
        "mistral" => "mistral:latest",
        "llama3.2" => "llama3.2:latest",
        "phi3" => "phi3:latest",
        "gemma2-2b" => "gemma2:2b",
        "qwen2-1.5b" => "qwen2:1.5b",
        other => other,
    }
    .to_string()
}
