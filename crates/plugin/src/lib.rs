//! Host plugin contract for Relicta release plugins.
//!
//! A plugin is loaded by the Relicta host and invoked at fixed points of the
//! release lifecycle. This crate defines the types exchanged across that
//! boundary so plugin crates only have to implement behaviour.
//!
//! # Architecture
//!
//! - [`Plugin`] - the trait every plugin implements (`info`, `execute`, `validate`)
//! - [`Hook`] - lifecycle points the host can invoke
//! - [`ReleaseContext`] - the release event handed to the plugin
//! - [`ExecuteRequest`] / [`ExecuteResponse`] - one hook invocation
//! - [`ValidationBuilder`] / [`ValidateResponse`] - field-scoped config checks
//! - [`ConfigParser`] - decodes the host's loosely typed config map
//!
//! # Example
//!
//! ```rust,ignore
//! use relicta_plugin::{ExecuteRequest, ExecuteResponse, Hook, Plugin};
//!
//! let response = plugin.execute(request, cancel).await?;
//! if !response.success {
//!     eprintln!("{}", response.error.unwrap_or_default());
//! }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod hook;
pub mod plugin;
pub mod request;
pub mod validation;

pub use config::{ConfigMap, ConfigParser};
pub use context::{CategorizedChanges, ConventionalCommit, ReleaseContext};
pub use error::{Error, Result};
pub use hook::Hook;
pub use plugin::Plugin;
pub use request::{ExecuteRequest, ExecuteResponse, PluginInfo};
pub use validation::{ValidateResponse, ValidationBuilder, ValidationError};

/// Cancellation signal passed with every invocation.
pub use tokio_util::sync::CancellationToken;
