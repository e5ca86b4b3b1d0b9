//! Construction of [`ReleaseApi`] clients per invocation.

use crate::api::ReleaseApi;
use crate::client::{DEFAULT_TIMEOUT, SentryClient};
use crate::config::SentryConfig;
use crate::error::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Builds the API client an invocation talks to.
///
/// The plugin asks for a client only after it knows remote calls will be
/// made, so dry runs never construct one.
pub trait Connector: Send + Sync {
    /// Creates a client for `config`, bound to `cancel`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration cannot produce a client.
    fn connect(
        &self,
        config: &SentryConfig,
        cancel: CancellationToken,
    ) -> Result<Box<dyn ReleaseApi>>;
}

/// Connects over HTTPS with [`SentryClient`].
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl HttpConnector {
    /// Creates a connector with a custom request timeout.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Connector for HttpConnector {
    fn connect(
        &self,
        config: &SentryConfig,
        cancel: CancellationToken,
    ) -> Result<Box<dyn ReleaseApi>> {
        let client = SentryClient::with_timeout(
            &config.url,
            config.auth_token.clone(),
            config.org.clone(),
            self.timeout,
        )?
        .with_cancellation(cancel);
        Ok(Box::new(client))
    }
}
