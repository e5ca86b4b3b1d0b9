//! Invocation request and response types.

use crate::config::ConfigMap;
use crate::context::ReleaseContext;
use crate::hook::Hook;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Static metadata a plugin reports to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name used in host configuration.
    pub name: String,
    /// Plugin version.
    pub version: String,
    /// One-line description.
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
    /// Hooks the plugin handles.
    pub hooks: Vec<Hook>,
}

impl PluginInfo {
    /// Whether the plugin declares the given hook.
    #[must_use]
    pub fn supports(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }
}

/// One hook invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteRequest {
    /// Lifecycle point being executed.
    pub hook: Hook,
    /// Raw plugin configuration from the host.
    #[serde(default)]
    pub config: ConfigMap,
    /// The release event.
    #[serde(default)]
    pub context: ReleaseContext,
    /// Report intended actions without side effects.
    #[serde(default)]
    pub dry_run: bool,
}

impl ExecuteRequest {
    /// Creates a new request with an empty config and context.
    #[must_use]
    pub fn new(hook: Hook) -> Self {
        Self {
            hook,
            config: ConfigMap::new(),
            context: ReleaseContext::default(),
            dry_run: false,
        }
    }

    /// Sets the configuration map.
    #[must_use]
    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = config;
        self
    }

    /// Sets the release context.
    #[must_use]
    pub fn with_context(mut self, context: ReleaseContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the dry-run flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of a hook invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Whether the hook succeeded.
    pub success: bool,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Error description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Named values for downstream consumers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Value>,
}

impl ExecuteResponse {
    /// Creates a successful response.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
            outputs: BTreeMap::new(),
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: String::new(),
            error: Some(error.into()),
            outputs: BTreeMap::new(),
        }
    }

    /// Adds a named output.
    #[must_use]
    pub fn with_output(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.outputs.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_success() {
        let response = ExecuteResponse::success("Created release").with_output("version", "1.0.0");
        assert!(response.success);
        assert_eq!(response.message, "Created release");
        assert!(response.error.is_none());
        assert_eq!(response.outputs["version"], Value::from("1.0.0"));
    }

    #[test]
    fn test_response_failure() {
        let response = ExecuteResponse::failure("boom");
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("boom"));
        assert!(response.message.is_empty());
    }

    #[test]
    fn test_response_serialization_skips_empty_fields() {
        let json = serde_json::to_value(ExecuteResponse::success("ok")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "ok"}));
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let request: ExecuteRequest = serde_json::from_str(r#"{"hook":"on-error"}"#).unwrap();
        assert_eq!(request.hook, Hook::OnError);
        assert!(request.config.is_empty());
        assert!(!request.dry_run);
    }

    #[test]
    fn test_request_builder_chain() {
        let mut config = ConfigMap::new();
        config.insert("org".to_string(), Value::from("acme"));
        let request = ExecuteRequest::new(Hook::PrePublish)
            .with_config(config)
            .with_dry_run(true);
        assert!(request.dry_run);
        assert_eq!(request.config["org"], Value::from("acme"));
    }

    #[test]
    fn test_plugin_info_supports() {
        let info = PluginInfo {
            name: "sentry".to_string(),
            version: "0.1.0".to_string(),
            description: String::new(),
            author: String::new(),
            hooks: vec![Hook::PrePublish],
        };
        assert!(info.supports(Hook::PrePublish));
        assert!(!info.supports(Hook::PostPlan));
    }
}
