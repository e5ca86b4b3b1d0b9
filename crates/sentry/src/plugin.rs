//! [`Plugin`] implementation for Sentry.

use crate::config::SentryConfig;
use crate::connector::{Connector, HttpConnector};
use crate::error::Error;
use crate::orchestrator::ReleaseOrchestrator;
use crate::version::VersionTemplate;
use async_trait::async_trait;
use relicta_plugin::{
    ConfigMap, ExecuteRequest, ExecuteResponse, Hook, Plugin, PluginInfo, ValidateResponse,
    ValidationBuilder,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Plugin name reported to the host.
pub const PLUGIN_NAME: &str = "sentry";

/// Hooks this plugin acts on.
pub const HOOKS: [Hook; 3] = [Hook::PrePublish, Hook::PostPublish, Hook::OnError];

/// Sentry release tracking, deploy notifications and commit association.
#[derive(Clone)]
pub struct SentryPlugin {
    connector: Arc<dyn Connector>,
    remote_validation: bool,
}

impl Default for SentryPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SentryPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryPlugin")
            .field("remote_validation", &self.remote_validation)
            .finish_non_exhaustive()
    }
}

impl SentryPlugin {
    /// Creates a plugin that talks to Sentry over HTTPS.
    #[must_use]
    pub fn new() -> Self {
        Self::with_connector(Arc::new(HttpConnector::default()))
    }

    /// Creates a plugin that obtains clients from `connector`.
    #[must_use]
    pub fn with_connector(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            remote_validation: true,
        }
    }

    /// Enables or disables the credential check performed by `validate`.
    #[must_use]
    pub const fn with_remote_validation(mut self, enabled: bool) -> Self {
        self.remote_validation = enabled;
        self
    }

    fn orchestrator<'a>(
        &'a self,
        config: &'a SentryConfig,
        cancel: CancellationToken,
    ) -> ReleaseOrchestrator<'a> {
        ReleaseOrchestrator::new(config, self.connector.as_ref(), cancel)
    }

    async fn check_credentials(
        &self,
        config: &SentryConfig,
        cancel: CancellationToken,
        builder: &mut ValidationBuilder,
    ) {
        let api = match self.connector.connect(config, cancel) {
            Ok(api) => api,
            Err(e) => {
                builder.add_error("url", detail(&e));
                return;
            }
        };
        match api.get_organization().await {
            Ok(org) => debug!(org = %org.slug, "Sentry credentials accepted"),
            Err(e) => {
                builder.add_error(
                    "auth_token",
                    format!("Failed to authenticate with Sentry: {e}"),
                );
            }
        }
    }
}

/// Message of an error without its category prefix where that prefix would
/// repeat the caller's wording.
fn detail(err: &Error) -> String {
    match err {
        Error::Template { message } | Error::Config { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

/// Maps a phase error to the failed response the host sees.
fn failure(err: &Error) -> ExecuteResponse {
    let message = match err {
        Error::Template { .. } => format!("Failed to format version: {}", detail(err)),
        Error::Config { .. } => format!("Failed to create Sentry client: {}", detail(err)),
        other => format!("Failed to create release: {other}"),
    };
    ExecuteResponse::failure(message)
}

#[async_trait]
impl Plugin for SentryPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo {
            name: PLUGIN_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: "Sentry release tracking, deploy notifications, and commit association"
                .to_string(),
            author: "Relicta".to_string(),
            hooks: HOOKS.to_vec(),
        }
    }

    #[instrument(skip_all, fields(hook = %request.hook, dry_run = request.dry_run))]
    async fn execute(
        &self,
        request: ExecuteRequest,
        cancel: CancellationToken,
    ) -> relicta_plugin::Result<ExecuteResponse> {
        let config = SentryConfig::from_map(&request.config);
        let orchestrator = self.orchestrator(&config, cancel);
        let ctx = &request.context;

        let response = match request.hook {
            Hook::PrePublish => orchestrator
                .pre_publish(ctx, request.dry_run)
                .await
                .map_or_else(|e| failure(&e), ExecuteResponse::from),
            Hook::PostPublish => orchestrator
                .post_publish(ctx, request.dry_run)
                .await
                .map_or_else(|e| failure(&e), ExecuteResponse::from),
            Hook::OnError => orchestrator.on_error(ctx),
            other => {
                debug!(hook = %other, "Hook not handled");
                ExecuteResponse::success(format!("Hook {other} not implemented"))
            }
        };

        info!(success = response.success, "Sentry hook finished");
        Ok(response)
    }

    #[instrument(skip_all)]
    async fn validate(
        &self,
        raw: &ConfigMap,
        cancel: CancellationToken,
    ) -> relicta_plugin::Result<ValidateResponse> {
        let config = SentryConfig::from_map(raw);
        let mut builder = ValidationBuilder::new();

        if !config.has_auth_token() {
            builder.add_error("auth_token", "Sentry auth token is required");
            return Ok(builder.build());
        }

        if config.org.is_empty() {
            builder.add_error("org", "Sentry organization is required");
        }

        if config.effective_projects().is_empty() {
            builder.add_error("project", "At least one project is required");
        }

        if let Err(e) = VersionTemplate::parse(&config.version_format) {
            builder.add_error(
                "version_format",
                format!("Invalid version format template: {}", detail(&e)),
            );
        }

        if self.remote_validation && !config.org.is_empty() {
            self.check_credentials(&config, cancel, &mut builder).await;
        }

        let response = builder.build();
        info!(valid = response.valid, errors = response.errors.len(), "Validated Sentry configuration");
        Ok(response)
    }
}
