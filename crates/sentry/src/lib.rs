//! Sentry release tracking for Relicta.
//!
//! Creates a Sentry release before a release is published, then associates
//! commits, records a deploy and finalizes the release once it is out.
//!
//! # Architecture
//!
//! - [`plugin`] - [`SentryPlugin`], the host-facing [`relicta_plugin::Plugin`]
//! - [`orchestrator`] - the ordered Sentry calls for each lifecycle phase
//! - [`client`] - [`SentryClient`], the HTTPS implementation of [`ReleaseApi`]
//! - [`connector`] - builds a client per invocation, swappable in tests
//! - [`config`] - typed plugin configuration with `SENTRY_*` fallbacks
//! - [`version`] - release version templates (`{{.Version}}`, ...)
//! - [`commits`] - commit records derived from the release changes
//!
//! # Example
//!
//! ```rust,ignore
//! use relicta_plugin::{CancellationToken, ExecuteRequest, Hook, Plugin};
//! use relicta_sentry::SentryPlugin;
//!
//! let plugin = SentryPlugin::new();
//! let request = ExecuteRequest::new(Hook::PrePublish)
//!     .with_config(config)
//!     .with_context(release);
//! let response = plugin.execute(request, CancellationToken::new()).await?;
//! println!("{}", response.message);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod api;
pub mod client;
pub mod commits;
pub mod config;
pub mod connector;
pub mod error;
pub mod orchestrator;
pub mod plugin;
pub mod version;

#[cfg(test)]
mod test_utils;

pub use api::{CommitSpec, Deploy, NewDeploy, NewRelease, Organization, Project, Release, ReleaseApi};
pub use client::SentryClient;
pub use config::SentryConfig;
pub use connector::{Connector, HttpConnector};
pub use error::{Error, Result};
pub use orchestrator::{
    PostPublishReport, PrePublishReport, ReleaseOrchestrator, ReleaseOutcome, Step, StepOutcome,
};
pub use plugin::SentryPlugin;
pub use version::{VersionTemplate, format_version};
