//! RAG file ingestion: reads named files from a shared RAG folder and emits
//! tokenizedChunks for the vector store.
//!
//! Read location: `OLO_RAG_DATA_DIR` when set is the full path to the RAG
//! root; otherwise the plugin data base dir plus a subfolder from
//! `OLO_RAG_SUBFOLDER` (default "rag").

use std::fs;
use std::path::{Path, PathBuf};

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{data_paths, PluginDescriptor, PortDescriptor};
use serde_json::{json, Value};

use crate::util::value_to_string;

pub const ENV_RAG_DATA_DIR: &str = "OLO_RAG_DATA_DIR";
pub const ENV_RAG_SUBFOLDER: &str = "OLO_RAG_SUBFOLDER";
const DEFAULT_RAG_SUBFOLDER: &str = "rag";

pub struct RagFileIngestionPlugin;

impl RagFileIngestionPlugin {
    pub const ID: &'static str = "com.openllm.plugin.rag.file.ingestion";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "RAG File Ingestion".to_string();
        d.description =
            "Reads named files from the configured RAG folder (env OLO_RAG_DATA_DIR or shared/rag), tokenizes, and outputs tokenizedChunks for vector DB."
                .to_string();
        d.category = plugin_types::FILTER.to_string();
        d.inputs = vec![PortDescriptor::typed("fileNames", "array")
            .required()
            .describe("File names (or comma-separated string) under the RAG folder")];
        d.outputs = vec![PortDescriptor::typed("tokenizedChunks", "array")
            .describe("Chunks from ingested files for vector DB")];
        d
    }

    /// RAG root from environment: OLO_RAG_DATA_DIR wins, otherwise the plugin
    /// data base dir plus the OLO_RAG_SUBFOLDER (default "rag").
    pub fn rag_base_path() -> PathBuf {
        if let Ok(dir) = std::env::var(ENV_RAG_DATA_DIR) {
            let dir = dir.trim();
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        let subfolder = match std::env::var(ENV_RAG_SUBFOLDER) {
            Ok(s) if !s.trim().is_empty() => {
                let s = s.trim().replace('\\', "/");
                if s.contains("..") || s.starts_with('/') {
                    DEFAULT_RAG_SUBFOLDER.to_string()
                } else {
                    s
                }
            }
            _ => DEFAULT_RAG_SUBFOLDER.to_string(),
        };
        data_paths::base_dir().join(subfolder)
    }

    fn parse_file_names(value: Option<&Value>) -> Vec<String> {
        match value {
            Some(Value::Array(items)) => items
                .iter()
                .filter(|v| !v.is_null())
                .map(value_to_string)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|x| !x.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    fn escapes_base(base: &Path, candidate: &Path) -> bool {
        // Normalize without touching the filesystem so missing files still
        // get the containment check.
        let mut normalized = PathBuf::new();
        for comp in candidate.components() {
            match comp {
                std::path::Component::ParentDir => {
                    normalized.pop();
                }
                std::path::Component::CurDir => {}
                other => normalized.push(other),
            }
        }
        !normalized.starts_with(base)
    }
}

impl CapabilityHandler for RagFileIngestionPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let file_names = Self::parse_file_names(ctx.original_input().get("fileNames"));
        if file_names.is_empty() {
            ctx.put_output(
                "error",
                "input.fileNames is required (array or comma-separated string)",
            );
            ctx.put_output("tokenizedChunks", json!([]));
            return CapabilityResult::from_context(self.name(), ctx);
        }

        let rag_base = Self::rag_base_path();
        let mut chunks: Vec<Value> = Vec::new();
        let mut error_msg = String::new();
        let mut index = 0usize;
        for file_name in file_names {
            if file_name.contains("..") {
                continue;
            }
            let file = rag_base.join(&file_name);
            if Self::escapes_base(&rag_base, &file) {
                error_msg.push_str(&format!("Path escape: {file_name}; "));
                continue;
            }
            if !file.is_file() {
                error_msg.push_str(&format!("Not a file or missing: {file_name}; "));
                continue;
            }
            match fs::read_to_string(&file) {
                Ok(text) => {
                    chunks.push(json!({ "path": file_name, "text": text, "index": index }));
                    index += 1;
                }
                Err(err) => {
                    error_msg.push_str(&format!("Read failed {file_name}: {err}; "));
                }
            }
        }
        if !error_msg.is_empty() {
            ctx.put_output("error", error_msg);
        }
        let count = chunks.len();
        ctx.put_output("tokenizedChunks", Value::Array(chunks));
        ctx.put_output("fileCount", count);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for RagFileIngestionPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for RagFileIngestionPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["fileNames"]
    }

    fn planner_description(&self) -> &str {
        "RAG: read named files from configured RAG folder, tokenize, output tokenizedChunks for vector DB."
    }
}

impl PluginTypeDescriptor for RagFileIngestionPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::FILTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn run(pairs: &[(&str, Value)]) -> CapabilityResult {
        let input: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let mut ctx = PluginContext::new(input, "test");
        RagFileIngestionPlugin.execute(&mut ctx)
    }

    fn with_rag_dir<F: FnOnce(&Path)>(f: F) {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var(ENV_RAG_DATA_DIR, dir.path());
        f(dir.path());
        std::env::remove_var(ENV_RAG_DATA_DIR);
    }

    #[test]
    fn missing_file_names_is_an_inline_error() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let result = run(&[]);
        assert_eq!(
            result.data["error"],
            json!("input.fileNames is required (array or comma-separated string)")
        );
        assert_eq!(result.data["tokenizedChunks"], json!([]));
    }

    #[test]
    fn reads_named_files_from_rag_dir() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        with_rag_dir(|base| {
            std::fs::write(base.join("doc1.txt"), "first").unwrap();
            std::fs::write(base.join("doc2.txt"), "second").unwrap();

            let result = run(&[("fileNames", json!(["doc1.txt", "doc2.txt"]))]);
            let chunks = result.data["tokenizedChunks"].as_array().unwrap();
            assert_eq!(chunks.len(), 2);
            assert_eq!(chunks[0]["path"], json!("doc1.txt"));
            assert_eq!(chunks[0]["text"], json!("first"));
            assert_eq!(chunks[1]["index"], json!(1));
            assert_eq!(result.data["fileCount"], json!(2));
            assert!(!result.data.contains_key("error"));
        });
    }

    #[test]
    fn comma_separated_string_is_accepted() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        with_rag_dir(|base| {
            std::fs::write(base.join("a.txt"), "a").unwrap();
            std::fs::write(base.join("b.txt"), "b").unwrap();

            let result = run(&[("fileNames", json!("a.txt, b.txt"))]);
            assert_eq!(result.data["fileCount"], json!(2));
        });
    }

    #[test]
    fn traversal_names_are_skipped_silently() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        with_rag_dir(|base| {
            std::fs::write(base.join("ok.txt"), "ok").unwrap();

            let result = run(&[("fileNames", json!(["../outside.txt", "ok.txt"]))]);
            assert_eq!(result.data["fileCount"], json!(1));
            assert!(!result.data.contains_key("error"));
        });
    }

    #[test]
    fn missing_file_is_reported_in_error_string() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        with_rag_dir(|_| {
            let result = run(&[("fileNames", json!(["ghost.txt"]))]);
            assert_eq!(
                result.data["error"],
                json!("Not a file or missing: ghost.txt; ")
            );
            assert_eq!(result.data["fileCount"], json!(0));
        });
    }
}
