//! Per-invocation view of pipeline state.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::state::StateStore;

/// State visible to one plugin invocation.
///
/// Three tiers: the immutable original request input, the accumulated output
/// merged by the scheduler from all prior stages, and the current plugin
/// output populated only by this invocation via [`put_output`]. The keyed
/// state store is shared by reference across every invocation of the same
/// pipeline execution.
///
/// The scheduler builds one context per invocation and merges
/// [`current_output`] into the accumulated output of later stages; a value
/// written here becomes visible downstream only through that merge.
///
/// [`put_output`]: PluginContext::put_output
/// [`current_output`]: PluginContext::current_output
#[derive(Debug, Clone)]
pub struct PluginContext {
    original_input: Arc<Map<String, Value>>,
    accumulated_output: Map<String, Value>,
    current_output: Map<String, Value>,
    state: Arc<StateStore>,
    pipeline_name: String,
}

impl PluginContext {
    /// Context for the first stage of an execution, with a fresh state store.
    pub fn new(original_input: Map<String, Value>, pipeline_name: impl Into<String>) -> Self {
        Self::with_state(original_input, pipeline_name, Arc::new(StateStore::new()))
    }

    /// Context sharing an existing keyed state store, as the scheduler does
    /// for every stage after the first.
    pub fn with_state(
        original_input: Map<String, Value>,
        pipeline_name: impl Into<String>,
        state: Arc<StateStore>,
    ) -> Self {
        Self {
            original_input: Arc::new(original_input),
            accumulated_output: Map::new(),
            current_output: Map::new(),
            state,
            pipeline_name: pipeline_name.into(),
        }
    }

    /// The request input; identical for every stage, never mutated.
    pub fn original_input(&self) -> &Map<String, Value> {
        &self.original_input
    }

    /// String value from the original input, trimmed-empty treated as set.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.original_input.get(key).and_then(Value::as_str)
    }

    /// Merged outputs of all prior stages, in pipeline order.
    pub fn accumulated_output(&self) -> &Map<String, Value> {
        &self.accumulated_output
    }

    pub fn accumulated_str(&self, key: &str) -> Option<&str> {
        self.accumulated_output.get(key).and_then(Value::as_str)
    }

    /// Scheduler-side: merge a finished stage's output into the view later
    /// stages receive. Later writes win per key.
    pub fn merge_accumulated(&mut self, output: Map<String, Value>) {
        self.accumulated_output.extend(output);
    }

    /// Output written by the current invocation only.
    pub fn current_output(&self) -> &Map<String, Value> {
        &self.current_output
    }

    pub fn put_output(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.current_output.insert(key.into(), value.into());
    }

    /// Keyed state lookup; `None` for an unset key.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.get(key)
    }

    /// Keyed state write, visible to every invocation sharing the store.
    pub fn put(&self, key: impl Into<String>, value: Value) {
        self.state.put(key, value);
    }

    /// The shared store itself, for a scheduler wiring the next invocation.
    pub fn state(&self) -> &Arc<StateStore> {
        &self.state
    }

    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn output_starts_empty_and_collects_writes() {
        let mut ctx = PluginContext::new(input(&[("question", json!("hi"))]), "chat-mistral");
        assert!(ctx.current_output().is_empty());
        ctx.put_output("result", "answer");
        ctx.put_output("observed", true);
        assert_eq!(ctx.current_output()["result"], json!("answer"));
        assert_eq!(ctx.current_output()["observed"], json!(true));
        assert_eq!(ctx.pipeline_name(), "chat-mistral");
    }

    #[test]
    fn state_travels_between_invocations() {
        let first = PluginContext::new(Map::new(), "qa");
        first.put("cache:k", json!("v"));

        let second = PluginContext::with_state(Map::new(), "qa", Arc::clone(first.state()));
        assert_eq!(second.get("cache:k"), Some(json!("v")));
        assert_eq!(second.get("cache:other"), None);
    }

    #[test]
    fn merge_accumulated_makes_prior_output_visible() {
        let mut ctx = PluginContext::new(Map::new(), "qa");
        ctx.merge_accumulated(input(&[("result", json!("from stage 1"))]));
        ctx.merge_accumulated(input(&[("result", json!("from stage 2"))]));
        assert_eq!(ctx.accumulated_str("result"), Some("from stage 2"));
    }
}
