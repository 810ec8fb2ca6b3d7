//! Compiles a set of [`PluginDescriptor`]s into the canonical `plugin.yaml`
//! manifest.
//!
//! One descriptor yields a single `plugin:` document, several yield a
//! `plugins:` list; the field order, defaulting and escaping rules are fixed
//! so downstream packaging and the UI can rely on a canonical shape. Default
//! icon fallback paths are always emitted alongside the unit-specific ones
//! so a renderer can fall back when a unit-specific asset is absent.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::package;
use crate::PluginDescriptor;

/// A declaration that cannot be compiled, reported against its unit.
/// Other declarations in the same run still compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationError {
    /// Implementing unit of the offending declaration.
    pub unit: String,
    pub message: String,
}

impl fmt::Display for DeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.unit, self.message)
    }
}

impl std::error::Error for DeclarationError {}

/// Outcome of one compilation run: the manifest (absent when no valid
/// declarations were found) plus the per-unit declaration errors.
#[derive(Debug)]
pub struct CompileReport {
    pub manifest: Option<String>,
    pub errors: Vec<DeclarationError>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Compiles descriptors into manifest text. Zero descriptors produce no
/// output and no error; a descriptor without an id is skipped and reported.
/// Duplicate ids are never merged: both entries are emitted (cross-unit
/// uniqueness is the host's responsibility).
pub fn compile_manifest(descriptors: &[PluginDescriptor]) -> CompileReport {
    let mut errors = Vec::new();
    let mut valid: Vec<&PluginDescriptor> = Vec::new();
    for d in descriptors {
        if d.id.trim().is_empty() {
            errors.push(DeclarationError {
                unit: d.unit.clone(),
                message: "plugin declaration is missing the required id".to_string(),
            });
            continue;
        }
        valid.push(d);
    }

    let mut seen = HashSet::new();
    for d in &valid {
        if !seen.insert(d.id.as_str()) {
            warn!(id = %d.id, unit = %d.unit, "duplicate plugin id; emitting both entries");
        }
    }

    if valid.is_empty() {
        return CompileReport {
            manifest: None,
            errors,
        };
    }

    let mut out = String::new();
    out.push_str("# Generated from plugin descriptors - Open LLM Orchestrator plugin descriptor\n");
    out.push_str("schemaVersion: \"1.0\"\n\n");
    let multiple = valid.len() > 1;
    if multiple {
        out.push_str("plugins:\n");
    }
    for d in &valid {
        if multiple {
            out.push_str("  - plugin:\n");
            append_plugin_block(&mut out, d, "    ");
        } else {
            out.push_str("plugin:\n");
            append_plugin_block(&mut out, d, "  ");
        }
    }
    debug!(count = valid.len(), "compiled plugin manifest");
    CompileReport {
        manifest: Some(out),
        errors,
    }
}

/// Compiles and writes `plugin.yaml` into `dir`. Exactly one artifact per
/// run; nothing is written when there is no valid declaration.
pub fn write_manifest(dir: &Path, descriptors: &[PluginDescriptor]) -> Result<CompileReport> {
    let report = compile_manifest(descriptors);
    if let Some(manifest) = &report.manifest {
        let path = dir.join(package::PLUGIN_YAML);
        std::fs::write(&path, manifest)
            .with_context(|| format!("failed to write manifest: {}", path.display()))?;
    }
    Ok(report)
}

fn append_plugin_block(out: &mut String, d: &PluginDescriptor, indent: &str) {
    let simple = d.simple_unit_name();
    push_field(out, indent, "id", &d.id);
    let name = if d.name.is_empty() { simple } else { &d.name };
    push_field(out, indent, "name", name);
    push_field(out, indent, "version", &d.version);
    push_field(out, indent, "description", &d.description);
    if !d.author.is_empty() {
        push_field(out, indent, "author", &d.author);
    }
    push_field(out, indent, "license", &d.license);
    let category = if d.category.is_empty() {
        "CUSTOM"
    } else {
        &d.category
    };
    push_field(out, indent, "category", category);
    push_field(out, indent, "unit", &d.unit);
    if !d.website.is_empty() {
        push_field(out, indent, "website", &d.website);
    }
    out.push_str(indent);
    out.push_str("inputs:\n");
    for port in &d.inputs {
        out.push_str(&format!("{indent}  - name: {}\n", escape_yaml(&port.name)));
        out.push_str(&format!(
            "{indent}    type: {}\n",
            escape_yaml(&port.port_type)
        ));
        out.push_str(&format!("{indent}    required: {}\n", port.required));
        out.push_str(&format!(
            "{indent}    description: {}\n",
            escape_yaml(&port.description)
        ));
    }
    out.push_str(indent);
    out.push_str("outputs:\n");
    for port in &d.outputs {
        out.push_str(&format!("{indent}  - name: {}\n", escape_yaml(&port.name)));
        out.push_str(&format!(
            "{indent}    type: {}\n",
            escape_yaml(&port.port_type)
        ));
        out.push_str(&format!(
            "{indent}    description: {}\n",
            escape_yaml(&port.description)
        ));
    }
    if !d.sample_input.is_empty() {
        push_field(out, indent, "sampleInput", &d.sample_input);
    }
    if !d.sample_input_description.is_empty() {
        push_field(out, indent, "sampleInputDescription", &d.sample_input_description);
    }
    let small = if d.icon_small.is_empty() {
        package::icon_path_for_unit(simple, package::SUFFIX_ICON_64)
    } else {
        d.icon_small.clone()
    };
    let large = if d.icon_large.is_empty() {
        package::icon_path_for_unit(simple, package::SUFFIX_ICON_256)
    } else {
        d.icon_large.clone()
    };
    let banner = if d.banner.is_empty() {
        package::icon_path_for_unit(simple, package::SUFFIX_BANNER)
    } else {
        d.banner.clone()
    };
    out.push_str(indent);
    out.push_str("icons:\n");
    out.push_str(&format!("{indent}  smallSvg: {}\n", escape_yaml(&small)));
    out.push_str(&format!("{indent}  largeSvg: {}\n", escape_yaml(&large)));
    out.push_str(&format!("{indent}  bannerSvg: {}\n", escape_yaml(&banner)));
    out.push_str(&format!(
        "{indent}  defaultSmallSvg: {}\n",
        package::DEFAULT_ICON_64_SVG
    ));
    out.push_str(&format!(
        "{indent}  defaultLargeSvg: {}\n",
        package::DEFAULT_ICON_256_SVG
    ));
    out.push_str(&format!(
        "{indent}  defaultBannerSvg: {}\n",
        package::DEFAULT_BANNER_SVG
    ));
}

fn push_field(out: &mut String, indent: &str, key: &str, value: &str) {
    out.push_str(indent);
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&escape_yaml(value));
    out.push('\n');
}

/// Values containing a newline, colon, `#`, leading space or double quote
/// are emitted quoted with backslash/quote escapes and `\n` for newlines;
/// everything else is emitted bare.
fn escape_yaml(s: &str) -> String {
    if s.contains('\n')
        || s.contains(':')
        || s.contains('#')
        || s.starts_with(' ')
        || s.contains('"')
    {
        format!(
            "\"{}\"",
            s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
        )
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_values_stay_bare() {
        assert_eq!(escape_yaml("Echo Tool"), "Echo Tool");
        assert_eq!(escape_yaml("1.0.0"), "1.0.0");
        assert_eq!(escape_yaml(""), "");
    }

    #[test]
    fn special_values_are_quoted_and_escaped() {
        assert_eq!(escape_yaml("a: b"), "\"a: b\"");
        assert_eq!(escape_yaml("#tag"), "\"#tag\"");
        assert_eq!(escape_yaml(" lead"), "\" lead\"");
        assert_eq!(escape_yaml("line1\nline2"), "\"line1\\nline2\"");
        assert_eq!(escape_yaml("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_yaml("back\\slash: x"), "\"back\\\\slash: x\"");
    }

    #[test]
    fn empty_input_compiles_to_nothing() {
        let report = compile_manifest(&[]);
        assert!(report.manifest.is_none());
        assert!(report.is_clean());
    }

    #[test]
    fn missing_id_is_reported_against_the_unit() {
        let bad = PluginDescriptor::new("", "plugins::broken::NoIdPlugin");
        let good = PluginDescriptor::new("x.y.z", "plugins::ok::GoodPlugin");
        let report = compile_manifest(&[bad, good]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].unit, "plugins::broken::NoIdPlugin");
        // The remaining unit still compiles, as a single-plugin document.
        let manifest = report.manifest.unwrap();
        assert!(manifest.contains("plugin:\n"));
        assert!(!manifest.contains("plugins:"));
    }

    #[test]
    fn only_invalid_declarations_produce_no_manifest() {
        let bad = PluginDescriptor::new("  ", "plugins::broken::BlankIdPlugin");
        let report = compile_manifest(&[bad]);
        assert!(report.manifest.is_none());
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_emitted_twice_not_merged() {
        let a = PluginDescriptor::new("dup.id", "plugins::a::A");
        let b = PluginDescriptor::new("dup.id", "plugins::b::B");
        let manifest = compile_manifest(&[a, b]).manifest.unwrap();
        assert_eq!(manifest.matches("id: dup.id").count(), 2);
    }
}
