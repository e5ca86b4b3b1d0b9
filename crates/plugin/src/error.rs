//! Error types for the plugin boundary.

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for plugin boundary operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can cross the host/plugin boundary.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The host named a hook this contract does not know.
    #[error("Unknown hook: {hook}")]
    #[diagnostic(
        code(relicta::plugin::unknown_hook),
        help("Supported hooks are listed by `Hook::ALL`, e.g. pre-publish, post-publish, on-error")
    )]
    UnknownHook {
        /// The hook name as received
        hook: String,
    },
}

impl Error {
    /// Create a new unknown hook error.
    #[must_use]
    pub fn unknown_hook(hook: impl Into<String>) -> Self {
        Self::UnknownHook { hook: hook.into() }
    }
}
