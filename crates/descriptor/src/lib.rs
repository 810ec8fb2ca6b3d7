//! Descriptor model and build-time tooling for OLO (Open LLM Orchestrator)
//! plugins: the declarative metadata a plugin unit exposes, the fixed
//! package layout, the sandboxed per-plugin data directory and the
//! `plugin.yaml` compiler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod compiler;
pub mod data_paths;
pub mod package;

pub use compiler::{compile_manifest, write_manifest, CompileReport, DeclarationError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Structural role a plugin may occupy inside a GROUP construct.
/// CAPABILITY_STAGE is a normal stage under a capability; CONDITION is a
/// group if; ITERATOR a group loop; FORK/JOIN the async group fork/join.
pub enum ScopeRole {
    #[default]
    CapabilityStage,
    Condition,
    Iterator,
    Fork,
    Join,
}

impl fmt::Display for ScopeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScopeRole::CapabilityStage => "CAPABILITY_STAGE",
            ScopeRole::Condition => "CONDITION",
            ScopeRole::Iterator => "ITERATOR",
            ScopeRole::Fork => "FORK",
            ScopeRole::Join => "JOIN",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ScopeRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CAPABILITY_STAGE" => Ok(ScopeRole::CapabilityStage),
            "CONDITION" => Ok(ScopeRole::Condition),
            "ITERATOR" => Ok(ScopeRole::Iterator),
            "FORK" => Ok(ScopeRole::Fork),
            "JOIN" => Ok(ScopeRole::Join),
            other => Err(format!("unknown scope role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// One declared input or output port of a plugin, for UI binding.
pub struct PortDescriptor {
    pub name: String,
    /// Port value type tag ("string", "array", "object", ...).
    pub port_type: String,
    /// Only meaningful for inputs; outputs are never required.
    pub required: bool,
    pub description: String,
}

impl PortDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            port_type: "string".to_string(),
            required: false,
            description: String::new(),
        }
    }

    pub fn typed(name: impl Into<String>, port_type: impl Into<String>) -> Self {
        Self {
            port_type: port_type.into(),
            ..Self::new(name)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Declarative metadata for one plugin unit. Built once at compile time,
/// consumed exactly once by [`compile_manifest`], never mutated afterwards.
///
/// `unit` is the qualified path of the implementing Rust type (the analog of
/// the original class name); the simple unit name drives the name and icon
/// defaults.
pub struct PluginDescriptor {
    /// Unique dotted-namespace id (e.g. "com.openllm.plugin.vectordb").
    /// Required; a declaration without an id fails to compile.
    pub id: String,
    /// Qualified path of the implementing type, e.g.
    /// "plugins::tool::EchoToolPlugin".
    pub unit: String,
    /// Display name; empty means "use the simple unit name".
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    /// SPDX license identifier.
    pub license: String,
    /// Capability/category tag for palette grouping; empty means CUSTOM.
    pub category: String,
    pub scope_role: ScopeRole,
    /// Capability names this plugin can be used in; empty = unrestricted.
    pub scope_capabilities: Vec<String>,
    /// If true, only valid as direct child of a GROUP.
    pub scope_only_inside_group: bool,
    pub inputs: Vec<PortDescriptor>,
    pub outputs: Vec<PortDescriptor>,
    pub website: String,
    /// Explicit icon overrides; empty means "derive from the unit name".
    pub icon_small: String,
    pub icon_large: String,
    pub banner: String,
    /// Optional JSON object the UI can use as original input when running
    /// the plugin standalone.
    pub sample_input: String,
    pub sample_input_description: String,
}

impl PluginDescriptor {
    /// A descriptor with the documented defaults: version 1.0.0, license
    /// Apache-2.0, category CUSTOM (applied at emission when left empty).
    pub fn new(id: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit: unit.into(),
            name: String::new(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: String::new(),
            license: "Apache-2.0".to_string(),
            category: String::new(),
            scope_role: ScopeRole::default(),
            scope_capabilities: Vec::new(),
            scope_only_inside_group: false,
            inputs: Vec::new(),
            outputs: Vec::new(),
            website: String::new(),
            icon_small: String::new(),
            icon_large: String::new(),
            banner: String::new(),
            sample_input: String::new(),
            sample_input_description: String::new(),
        }
    }

    /// Last segment of the implementing unit path ("EchoToolPlugin" for
    /// "plugins::tool::EchoToolPlugin").
    pub fn simple_unit_name(&self) -> &str {
        self.unit.rsplit("::").next().unwrap_or(&self.unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_contract() {
        let d = PluginDescriptor::new("x.y.z", "plugins::sample::Stub");
        assert_eq!(d.version, "1.0.0");
        assert_eq!(d.license, "Apache-2.0");
        assert_eq!(d.scope_role, ScopeRole::CapabilityStage);
        assert!(d.inputs.is_empty() && d.outputs.is_empty());
        assert_eq!(d.simple_unit_name(), "Stub");
    }

    #[test]
    fn scope_role_round_trips_as_text() {
        for role in [
            ScopeRole::CapabilityStage,
            ScopeRole::Condition,
            ScopeRole::Iterator,
            ScopeRole::Fork,
            ScopeRole::Join,
        ] {
            assert_eq!(role.to_string().parse::<ScopeRole>(), Ok(role));
        }
        assert!("STAGE".parse::<ScopeRole>().is_err());
    }

    #[test]
    fn port_builder_sets_fields() {
        let p = PortDescriptor::typed("folderPath", "string")
            .required()
            .describe("Path to folder");
        assert!(p.required);
        assert_eq!(p.port_type, "string");
        assert_eq!(p.description, "Path to folder");
    }
}
