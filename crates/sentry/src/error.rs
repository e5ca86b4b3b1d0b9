//! Error types for Sentry release operations.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for Sentry operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to Sentry or preparing a request.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The version format template could not be parsed or rendered.
    #[error("Invalid version format: {message}")]
    #[diagnostic(
        code(relicta::sentry::template),
        help("Reference release fields inside double braces: .Version, .TagName or .ShortSHA")
    )]
    Template {
        /// The error message
        message: String,
    },

    /// The request never produced an HTTP response.
    ///
    /// Covers connection failures, timeouts, cancellation and body read errors.
    #[error("Transport error: {message}")]
    #[diagnostic(code(relicta::sentry::transport))]
    Transport {
        /// The error message
        message: String,
    },

    /// Sentry answered with a non-success status.
    #[error("API error: {detail} (status {status})")]
    #[diagnostic(code(relicta::sentry::api))]
    RemoteApi {
        /// HTTP status code
        status: u16,
        /// The `detail` field of the error body, or the raw body
        detail: String,
    },

    /// A successful response body did not match the expected shape.
    #[error("Failed to decode response: {message}")]
    #[diagnostic(code(relicta::sentry::decode))]
    Decode {
        /// The error message
        message: String,
    },

    /// The client could not be built from the configuration.
    #[error("Sentry configuration error: {message}")]
    #[diagnostic(code(relicta::sentry::config), help("{help}"))]
    Config {
        /// The error message
        message: String,
        /// Help text for the user
        help: String,
    },
}

impl Error {
    /// Create a new template error.
    #[must_use]
    pub fn template(message: impl Into<String>) -> Self {
        Self::Template {
            message: message.into(),
        }
    }

    /// Create a new transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new remote API error.
    #[must_use]
    pub fn remote_api(status: u16, detail: impl Into<String>) -> Self {
        Self::RemoteApi {
            status,
            detail: detail.into(),
        }
    }

    /// Create a new decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.into(),
        }
    }

    /// Whether this error came from the version template.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        matches!(self, Self::Template { .. })
    }

    /// HTTP status carried by a remote API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
