//! Folder ingestion: reads files from a folder (optionally filtered by
//! extension) and emits them as tokenizedChunks for the vector store.
//! Relative folder paths resolve against the plugin data dir so uploads land
//! at a known location in containers.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use contract::{
    plugin_types, CapabilityHandler, CapabilityResult, ContractCompatibility,
    PlannerInputDescriptor, PluginContext, PluginTypeDescriptor, CONTRACT_VERSION,
};
use descriptor::{data_paths, PluginDescriptor, PortDescriptor};
use serde_json::{json, Value};
use tracing::debug;

// Binary formats (e.g. pdf, doc) are read as UTF-8; proper text extraction
// needs a prior conversion step.
const DEFAULT_EXTENSIONS: &str =
    ".txt,.md,.pdf,.doc,.docx,.ppt,.pptx,.xls,.xlsx,.csv,.odt,.ods,.odp,.rtf,.html,.htm,.xml,.json";
const ENV_DEFAULT_EXTENSIONS: &str = "FOLDER_INGESTION_DEFAULT_EXTENSIONS";

pub struct FolderIngestionPlugin;

impl FolderIngestionPlugin {
    pub const ID: &'static str = "com.openllm.plugin.folder.ingestion";

    pub fn descriptor() -> PluginDescriptor {
        let mut d = PluginDescriptor::new(Self::ID, std::any::type_name::<Self>());
        d.name = "Folder Ingestion".to_string();
        d.description =
            "Reads files from a folder and outputs tokenizedChunks for vector DB storage."
                .to_string();
        d.category = plugin_types::FILTER.to_string();
        d.inputs = vec![
            PortDescriptor::new("folderPath")
                .required()
                .describe("Path to folder"),
            PortDescriptor::new("fileExtensions").describe(
                "Comma-separated extensions e.g. .txt,.md,.pdf,.doc,.docx,.csv (default: common doc formats)",
            ),
            PortDescriptor::typed("recursive", "boolean").describe("Include subdirectories"),
        ];
        d.outputs = vec![PortDescriptor::typed("tokenizedChunks", "array")
            .describe("Chunks from ingested files")];
        d
    }

    fn default_extensions() -> BTreeSet<String> {
        let raw = crate::util::env_or(ENV_DEFAULT_EXTENSIONS, DEFAULT_EXTENSIONS);
        Self::split_extensions(&raw)
    }

    fn split_extensions(raw: &str) -> BTreeSet<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('.') {
                    s.to_string()
                } else {
                    format!(".{s}")
                }
            })
            .collect()
    }

    fn parse_extensions(raw: Option<&str>) -> BTreeSet<String> {
        match raw {
            Some(s) if !s.trim().is_empty() => Self::split_extensions(s),
            _ => Self::default_extensions(),
        }
    }

    fn matches(path: &Path, extensions: &BTreeSet<String>) -> bool {
        let name = path.to_string_lossy().to_lowercase();
        extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    fn list_files(
        base: &Path,
        recursive: bool,
        extensions: &BTreeSet<String>,
    ) -> std::io::Result<Vec<PathBuf>> {
        let mut out = Vec::new();
        if !base.is_dir() {
            return Ok(out);
        }
        let mut stack = vec![base.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.is_dir() {
                    if recursive {
                        stack.push(path);
                    }
                } else if path.is_file() && Self::matches(&path, extensions) {
                    out.push(path);
                }
            }
        }
        out.sort();
        Ok(out)
    }
}

impl CapabilityHandler for FolderIngestionPlugin {
    fn name(&self) -> &str {
        Self::ID
    }

    fn execute(&self, ctx: &mut PluginContext) -> CapabilityResult {
        let folder_path = match ctx.input_str("folderPath") {
            Some(p) if !p.trim().is_empty() => p.to_string(),
            _ => {
                ctx.put_output("error", "input.folderPath is required");
                ctx.put_output("tokenizedChunks", json!([]));
                return CapabilityResult::from_context(self.name(), ctx);
            }
        };
        let extensions = Self::parse_extensions(ctx.input_str("fileExtensions"));
        let recursive = ctx
            .original_input()
            .get("recursive")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let base = if Path::new(&folder_path).is_absolute() {
            PathBuf::from(&folder_path)
        } else {
            match data_paths::resolve(Self::ID, &folder_path) {
                Ok(p) => p,
                Err(err) => {
                    ctx.put_output("error", format!("Failed to read folder: {err}"));
                    ctx.put_output("tokenizedChunks", json!([]));
                    ctx.put_output("fileCount", 0);
                    return CapabilityResult::from_context(self.name(), ctx);
                }
            }
        };

        let mut chunks: Vec<Value> = Vec::new();
        match Self::list_files(&base, recursive, &extensions) {
            Ok(files) => {
                // The first unreadable file stops ingestion; the chunks read
                // so far are still emitted.
                for (index, file) in files.iter().enumerate() {
                    let relative = file
                        .strip_prefix(&base)
                        .unwrap_or(file)
                        .to_string_lossy()
                        .into_owned();
                    match fs::read_to_string(file) {
                        Ok(text) => {
                            chunks.push(json!({ "path": relative, "text": text, "index": index }));
                        }
                        Err(err) => {
                            ctx.put_output("error", format!("Failed to read folder: {err}"));
                            break;
                        }
                    }
                }
                debug!(count = chunks.len(), folder = %base.display(), "ingested folder");
            }
            Err(err) => {
                ctx.put_output("error", format!("Failed to read folder: {err}"));
            }
        }

        let count = chunks.len();
        ctx.put_output("tokenizedChunks", Value::Array(chunks));
        ctx.put_output("fileCount", count);
        CapabilityResult::from_context(self.name(), ctx)
    }
}

impl ContractCompatibility for FolderIngestionPlugin {
    fn required_contract_version(&self) -> &str {
        CONTRACT_VERSION
    }
}

impl PlannerInputDescriptor for FolderIngestionPlugin {
    fn required_input_fields(&self) -> &'static [&'static str] {
        &["folderPath", "fileExtensions", "recursive"]
    }

    fn planner_description(&self) -> &str {
        "Filter: ingest folder files into tokenizedChunks for vector store."
    }
}

impl PluginTypeDescriptor for FolderIngestionPlugin {
    fn plugin_type(&self) -> &str {
        plugin_types::FILTER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn run(pairs: &[(&str, Value)]) -> CapabilityResult {
        let input: Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let mut ctx = PluginContext::new(input, "test");
        FolderIngestionPlugin.execute(&mut ctx)
    }

    #[test]
    fn missing_folder_path_is_an_inline_error() {
        let result = run(&[]);
        assert_eq!(result.data["error"], json!("input.folderPath is required"));
        assert_eq!(result.data["tokenizedChunks"], json!([]));
    }

    #[test]
    fn ingests_matching_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("skip.bin"), "binary").unwrap();

        let result = run(&[(
            "folderPath",
            json!(dir.path().to_string_lossy().into_owned()),
        )]);
        let chunks = result.data["tokenizedChunks"].as_array().unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0]["path"], json!("a.txt"));
        assert_eq!(chunks[0]["text"], json!("first"));
        assert_eq!(chunks[0]["index"], json!(0));
        assert_eq!(chunks[1]["path"], json!("b.txt"));
        assert_eq!(result.data["fileCount"], json!(2));
    }

    #[test]
    fn non_recursive_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("top.md"), "top").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/inner.md"), "inner").unwrap();

        let path = json!(dir.path().to_string_lossy().into_owned());
        let flat = run(&[("folderPath", path.clone())]);
        assert_eq!(flat.data["fileCount"], json!(1));

        let deep = run(&[("folderPath", path), ("recursive", json!(true))]);
        assert_eq!(deep.data["fileCount"], json!(2));
    }

    #[test]
    fn custom_extensions_filter() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.custom"), "x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "y").unwrap();

        let result = run(&[
            (
                "folderPath",
                json!(dir.path().to_string_lossy().into_owned()),
            ),
            ("fileExtensions", json!("custom")),
        ]);
        let chunks = result.data["tokenizedChunks"].as_array().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0]["path"], json!("notes.custom"));
    }

    #[test]
    fn first_unreadable_file_stops_ingestion_with_partial_chunks() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("b.txt"), [0xff, 0xfe, 0xff]).unwrap();
        std::fs::write(dir.path().join("c.txt"), "third").unwrap();

        let result = run(&[(
            "folderPath",
            json!(dir.path().to_string_lossy().into_owned()),
        )]);
        let chunks = result.data["tokenizedChunks"].as_array().unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0]["path"], json!("a.txt"));
        assert_eq!(result.data["fileCount"], json!(1));
        assert!(result.data["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read folder:"));
    }

    #[test]
    fn missing_directory_yields_empty_chunks() {
        let result = run(&[("folderPath", json!("/nonexistent/path/for/test"))]);
        assert_eq!(result.data["tokenizedChunks"], json!([]));
        assert_eq!(result.data["fileCount"], json!(0));
    }
}
