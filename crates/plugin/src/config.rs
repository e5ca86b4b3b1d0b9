//! Decoding of the host's plugin configuration map.
//!
//! The host hands plugins an untyped JSON object. [`ConfigParser`] reads typed
//! values out of it with per-key defaults and, for string values, an optional
//! environment variable consulted when the key is absent or empty.
//!
//! Lookup order for [`ConfigParser::get_string`]: config value, environment
//! variable, default.

use serde_json::{Map, Value};
use tracing::trace;

/// The raw configuration object a host passes to a plugin.
pub type ConfigMap = Map<String, Value>;

/// Typed read access to a [`ConfigMap`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigParser<'a> {
    raw: &'a ConfigMap,
}

impl<'a> ConfigParser<'a> {
    /// Wraps a configuration map.
    #[must_use]
    pub const fn new(raw: &'a ConfigMap) -> Self {
        Self { raw }
    }

    /// Reads a string, falling back to `env_var` and then to `default`.
    ///
    /// Empty strings count as absent.
    #[must_use]
    pub fn get_string(&self, key: &str, env_var: Option<&str>, default: &str) -> String {
        if let Some(value) = self.raw.get(key).and_then(Value::as_str)
            && !value.is_empty()
        {
            return value.to_string();
        }

        if let Some(var) = env_var
            && let Ok(value) = std::env::var(var)
            && !value.is_empty()
        {
            trace!(key, env_var = var, "Config value taken from environment");
            return value;
        }

        default.to_string()
    }

    /// Reads a boolean. Accepts JSON booleans and the strings `true`/`false`.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.raw.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            _ => default,
        }
    }

    /// Reads a list of strings. Non-string entries are skipped.
    #[must_use]
    pub fn get_string_list(&self, key: &str) -> Vec<String> {
        self.raw
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A nested object, if the key holds one.
    #[must_use]
    pub fn section(&self, key: &str) -> Option<ConfigParser<'a>> {
        self.raw.get(key).and_then(Value::as_object).map(Self::new)
    }
}
