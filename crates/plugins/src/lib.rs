//! The built-in plugin set of the OLO worker.
//!
//! Each module declares one plugin unit: its [`descriptor::PluginDescriptor`]
//! for manifest compilation and its [`contract::CapabilityHandler`] for
//! execution. [`builtin_descriptors`] is the ordered descriptor list the
//! manifest compiler consumes; [`builtin_handlers`] wires the matching
//! handlers for a host.

use std::sync::Arc;

use contract::{CapabilityHandler, StateStore};
use descriptor::PluginDescriptor;

pub mod access;
pub mod caching;
pub mod folder;
pub mod guardrail;
pub mod llm;
pub mod memory;
pub mod observability;
pub mod output;
pub mod prompt;
pub mod rag;
pub mod sample;
pub mod tokenizer;
pub mod tool;
pub mod vectordb;

mod util;

/// Ordered descriptors of every built-in plugin, for manifest compilation.
pub fn builtin_descriptors() -> Vec<PluginDescriptor> {
    vec![
        tool::EchoToolPlugin::descriptor(),
        access::AllowAllAccessControlPlugin::descriptor(),
        caching::InMemoryCachingPlugin::descriptor(),
        memory::ContextMemoryPlugin::descriptor(),
        guardrail::SimpleGuardrailPlugin::descriptor(),
        prompt::SimplePromptBuilderPlugin::descriptor(),
        output::AnswerFormatPlugin::descriptor(),
        observability::PassThroughObservabilityPlugin::descriptor(),
        tokenizer::DocumentTokenizerPlugin::descriptor(),
        folder::FolderIngestionPlugin::descriptor(),
        rag::RagFileIngestionPlugin::descriptor(),
        vectordb::VectorStoreRetrievalPlugin::descriptor(),
        llm::ollama::OllamaChatPlugin::descriptor(),
        llm::ollama::OllamaRagPlugin::descriptor(),
        llm::ollama::FixedModelChatPlugin::llama32().descriptor(),
        llm::ollama::FixedModelChatPlugin::phi3().descriptor(),
        llm::ollama::FixedModelChatPlugin::qwen2().descriptor(),
        sample::SampleEchoPlugin::descriptor(),
        sample::StubConditionPlugin::descriptor(),
    ]
}

/// Handlers for every built-in plugin, in descriptor order. The caching
/// plugin is constructed over the given process-lifetime shared cache.
pub fn builtin_handlers(shared_cache: Arc<StateStore>) -> Vec<Box<dyn CapabilityHandler>> {
    vec![
        Box::new(tool::EchoToolPlugin),
        Box::new(access::AllowAllAccessControlPlugin),
        Box::new(caching::InMemoryCachingPlugin::new(shared_cache)),
        Box::new(memory::ContextMemoryPlugin),
        Box::new(guardrail::SimpleGuardrailPlugin),
        Box::new(prompt::SimplePromptBuilderPlugin),
        Box::new(output::AnswerFormatPlugin),
        Box::new(observability::PassThroughObservabilityPlugin),
        Box::new(tokenizer::DocumentTokenizerPlugin),
        Box::new(folder::FolderIngestionPlugin),
        Box::new(rag::RagFileIngestionPlugin),
        Box::new(vectordb::VectorStoreRetrievalPlugin),
        Box::new(llm::ollama::OllamaChatPlugin),
        Box::new(llm::ollama::OllamaRagPlugin),
        Box::new(llm::ollama::FixedModelChatPlugin::llama32()),
        Box::new(llm::ollama::FixedModelChatPlugin::phi3()),
        Box::new(llm::ollama::FixedModelChatPlugin::qwen2()),
        Box::new(sample::SampleEchoPlugin),
        Box::new(sample::StubConditionPlugin),
    ]
}
