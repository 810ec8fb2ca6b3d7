//! Env and JSON value helpers shared by the built-in plugins.

use serde_json::Value;

/// Trimmed environment value, or the default when unset or blank.
pub(crate) fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Positive integer from the environment; anything unset, unparsable or
/// non-positive falls back.
pub(crate) fn env_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(v) => match v.trim().parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => default,
        },
        _ => default,
    }
}

/// Display form of any JSON value: strings unquoted, everything else in
/// its JSON rendering.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_to_string_unquotes_strings_only() {
        assert_eq!(value_to_string(&json!("plain")), "plain");
        assert_eq!(value_to_string(&json!(42)), "42");
        assert_eq!(value_to_string(&json!(["a"])), "[\"a\"]");
    }

    #[test]
    fn env_usize_rejects_zero_and_garbage() {
        std::env::set_var("OLO_TEST_ENV_USIZE", "0");
        assert_eq!(env_usize("OLO_TEST_ENV_USIZE", 7), 7);
        std::env::set_var("OLO_TEST_ENV_USIZE", "notanumber");
        assert_eq!(env_usize("OLO_TEST_ENV_USIZE", 7), 7);
        std::env::set_var("OLO_TEST_ENV_USIZE", "12");
        assert_eq!(env_usize("OLO_TEST_ENV_USIZE", 7), 12);
        std::env::remove_var("OLO_TEST_ENV_USIZE");
    }
}
