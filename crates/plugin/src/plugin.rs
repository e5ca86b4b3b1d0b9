//! The plugin trait.

use crate::config::ConfigMap;
use crate::error::Result;
use crate::request::{ExecuteRequest, ExecuteResponse, PluginInfo};
use crate::validation::ValidateResponse;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Trait implemented by every Relicta plugin.
///
/// Each call is independent: plugins hold no state between invocations, so a
/// host may run invocations for different releases concurrently.
///
/// `cancel` is triggered by the host when the invocation's deadline passes or
/// the user aborts; in-flight remote work should stop promptly.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Static metadata: name, version, description, handled hooks.
    fn info(&self) -> PluginInfo;

    /// Runs the plugin for one hook.
    ///
    /// # Errors
    ///
    /// Returns an error only when no structured response can be produced.
    /// Remote failures are reported inside the [`ExecuteResponse`].
    async fn execute(
        &self,
        request: ExecuteRequest,
        cancel: CancellationToken,
    ) -> Result<ExecuteResponse>;

    /// Checks a configuration map before any hook runs.
    ///
    /// # Errors
    ///
    /// Returns an error only when validation itself cannot run.
    async fn validate(
        &self,
        config: &ConfigMap,
        cancel: CancellationToken,
    ) -> Result<ValidateResponse>;
}
