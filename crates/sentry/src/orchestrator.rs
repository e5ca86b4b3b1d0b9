//! Release lifecycle orchestration.
//!
//! Translates one release event into the ordered Sentry calls for a hook:
//!
//! - pre-publish creates the release, reusing an existing one when the
//!   create call is rejected;
//! - post-publish associates commits, records a deploy and finalizes the
//!   release, each step best-effort;
//! - on-error only acknowledges the failure.
//!
//! The version is rendered once per phase and reused for every call. Dry runs
//! report what would happen without ever asking the [`Connector`] for a
//! client.

use crate::api::{NewDeploy, NewRelease, Release, ReleaseApi, timestamp};
use crate::commits::extract_commits;
use crate::config::SentryConfig;
use crate::connector::Connector;
use crate::error::Result;
use crate::version::format_version;
use relicta_plugin::{ExecuteResponse, ReleaseContext};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Message returned by the error hook.
pub const ERROR_NOTED: &str = "Release failure noted (no Sentry action taken)";

/// How pre-publish obtained the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseOutcome {
    /// The create call succeeded.
    Created,
    /// The create call failed but the release was already there.
    AlreadyExisted,
}

impl ReleaseOutcome {
    /// Wire name used in hook outputs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AlreadyExisted => "already_existed",
        }
    }
}

/// Result of the pre-publish phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrePublishReport {
    /// Dry run: nothing was sent.
    Planned {
        /// Rendered release version.
        version: String,
        /// Effective project list.
        projects: Vec<String>,
    },
    /// The release exists in Sentry.
    Published {
        /// Rendered release version.
        version: String,
        /// Release as returned by Sentry.
        release: Release,
        /// Whether it was created or reused.
        outcome: ReleaseOutcome,
    },
}

impl PrePublishReport {
    /// Rendered release version.
    #[must_use]
    pub fn version(&self) -> &str {
        match self {
            Self::Planned { version, .. } | Self::Published { version, .. } => version,
        }
    }

    /// Human-readable summary.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Planned { version, projects } => format!(
                "Would create Sentry release '{version}' for projects: {}",
                projects.join(", ")
            ),
            Self::Published {
                version,
                outcome: ReleaseOutcome::Created,
                ..
            } => format!("Created Sentry release: {version}"),
            Self::Published {
                version,
                outcome: ReleaseOutcome::AlreadyExisted,
                ..
            } => format!("Using existing Sentry release: {version}"),
        }
    }
}

impl From<PrePublishReport> for ExecuteResponse {
    fn from(report: PrePublishReport) -> Self {
        let response = Self::success(report.message());
        match report {
            PrePublishReport::Planned { version, projects } => response
                .with_output("version", version)
                .with_output("projects", projects),
            PrePublishReport::Published {
                version,
                release,
                outcome,
            } => response
                .with_output("version", version)
                .with_output("release_url", release.url.map_or(Value::Null, Value::from))
                .with_output(
                    "date_created",
                    release
                        .date_created
                        .map_or(Value::Null, |at| Value::from(timestamp(at))),
                )
                .with_output("outcome", outcome.as_str()),
        }
    }
}

/// A post-publish sub-step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Associate commits with the release.
    SetCommits,
    /// Record a deploy.
    CreateDeploy,
    /// Mark the release as released.
    Finalize,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SetCommits => "set commits",
            Self::CreateDeploy => "create deploy",
            Self::Finalize => "finalize release",
        })
    }
}

/// Outcome of one post-publish sub-step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    /// Which step ran.
    pub step: Step,
    /// Whether it succeeded (always true for planned steps).
    pub ok: bool,
    /// Summary or warning line.
    pub detail: String,
}

impl StepOutcome {
    fn ok(step: Step, detail: impl Into<String>) -> Self {
        Self {
            step,
            ok: true,
            detail: detail.into(),
        }
    }

    fn failed(step: Step, err: &crate::Error) -> Self {
        Self {
            step,
            ok: false,
            detail: format!("Warning: Failed to {step}: {err}"),
        }
    }
}

/// Result of the post-publish phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPublishReport {
    /// Rendered release version.
    pub version: String,
    /// Whether the steps were only planned.
    pub dry_run: bool,
    /// Steps in execution order.
    pub steps: Vec<StepOutcome>,
}

impl PostPublishReport {
    /// Step summaries joined with `"; "`, or `No actions taken`.
    #[must_use]
    pub fn message(&self) -> String {
        if self.steps.is_empty() {
            return "No actions taken".to_string();
        }
        self.steps
            .iter()
            .map(|s| s.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Steps that failed.
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| !s.ok)
    }
}

impl From<PostPublishReport> for ExecuteResponse {
    fn from(report: PostPublishReport) -> Self {
        let steps = serde_json::to_value(&report.steps).unwrap_or(Value::Null);
        Self::success(report.message())
            .with_output("version", report.version)
            .with_output("steps", steps)
    }
}

/// Runs release phases against Sentry for one invocation.
pub struct ReleaseOrchestrator<'a> {
    config: &'a SentryConfig,
    connector: &'a dyn Connector,
    cancel: CancellationToken,
}

impl<'a> ReleaseOrchestrator<'a> {
    /// Creates an orchestrator bound to `cancel`.
    #[must_use]
    pub fn new(
        config: &'a SentryConfig,
        connector: &'a dyn Connector,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            connector,
            cancel,
        }
    }

    fn connect(&self) -> Result<Box<dyn ReleaseApi>> {
        self.connector.connect(self.config, self.cancel.clone())
    }

    /// Creates the Sentry release for this event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if the version cannot be rendered,
    /// [`crate::Error::Config`] if no client can be built, and otherwise the
    /// error of the create call when no existing release could be fetched.
    pub async fn pre_publish(
        &self,
        ctx: &ReleaseContext,
        dry_run: bool,
    ) -> Result<PrePublishReport> {
        let version = format_version(&self.config.version_format, ctx)?;
        let projects = self.config.effective_projects();

        if dry_run {
            info!(version = %version, projects = ?projects, "[dry-run] Would create Sentry release");
            return Ok(PrePublishReport::Planned { version, projects });
        }

        let api = self.connect()?;
        let mut new_release = NewRelease::new(&version, projects);
        if !ctx.commit_sha.is_empty() {
            new_release = new_release.with_ref(&ctx.commit_sha);
        }

        let (release, outcome) = create_or_fetch_release(api.as_ref(), &new_release).await?;
        info!(version = %version, outcome = outcome.as_str(), "Sentry release ready");

        Ok(PrePublishReport::Published {
            version,
            release,
            outcome,
        })
    }

    /// Associates commits, records a deploy and finalizes the release.
    ///
    /// Step failures are recorded in the report and never stop later steps.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if the version cannot be rendered
    /// and [`crate::Error::Config`] if no client can be built.
    pub async fn post_publish(
        &self,
        ctx: &ReleaseContext,
        dry_run: bool,
    ) -> Result<PostPublishReport> {
        let version = format_version(&self.config.version_format, ctx)?;

        if dry_run {
            let steps = self.planned_steps();
            info!(version = %version, steps = steps.len(), "[dry-run] Would run post-publish steps");
            return Ok(PostPublishReport {
                version,
                dry_run: true,
                steps,
            });
        }

        let api = self.connect()?;
        let mut steps = Vec::new();

        if self.config.set_commits {
            let commits = if self.config.commits.auto {
                extract_commits(self.config, ctx)
            } else {
                Vec::new()
            };
            if commits.is_empty() {
                debug!(version = %version, "No commits to associate");
            } else {
                steps.push(match api.set_commits(&version, &commits).await {
                    Ok(()) => StepOutcome::ok(
                        Step::SetCommits,
                        format!("Associated {} commits", commits.len()),
                    ),
                    Err(e) => StepOutcome::failed(Step::SetCommits, &e),
                });
            }
        }

        if self.config.create_deploy {
            let deploy = NewDeploy::new(
                &self.config.deploy.environment,
                Some(self.config.deploy.name.clone()),
            );
            steps.push(match api.create_deploy(&version, &deploy).await {
                Ok(created) => {
                    let environment = if created.environment.is_empty() {
                        deploy.environment
                    } else {
                        created.environment
                    };
                    StepOutcome::ok(Step::CreateDeploy, format!("Created deploy: {environment}"))
                }
                Err(e) => StepOutcome::failed(Step::CreateDeploy, &e),
            });
        }

        if self.config.finalize {
            steps.push(match api.finalize_release(&version).await {
                Ok(()) => StepOutcome::ok(Step::Finalize, "Finalized release"),
                Err(e) => StepOutcome::failed(Step::Finalize, &e),
            });
        }

        let report = PostPublishReport {
            version,
            dry_run: false,
            steps,
        };
        for failure in report.failures() {
            warn!(step = ?failure.step, detail = %failure.detail, "Post-publish step failed");
        }
        info!(version = %report.version, steps = report.steps.len(), "Post-publish complete");
        Ok(report)
    }

    /// Acknowledges a failed release. Never contacts Sentry.
    #[must_use]
    pub fn on_error(&self, ctx: &ReleaseContext) -> ExecuteResponse {
        info!(version = %ctx.version, "Release failure noted");
        ExecuteResponse::success(ERROR_NOTED)
    }

    fn planned_steps(&self) -> Vec<StepOutcome> {
        let mut steps = Vec::new();
        if self.config.set_commits {
            steps.push(StepOutcome::ok(
                Step::SetCommits,
                "Would associate commits with release",
            ));
        }
        if self.config.create_deploy {
            steps.push(StepOutcome::ok(
                Step::CreateDeploy,
                format!(
                    "Would create deploy for environment: {}",
                    self.config.deploy.environment
                ),
            ));
        }
        if self.config.finalize {
            steps.push(StepOutcome::ok(Step::Finalize, "Would finalize release"));
        }
        steps
    }
}

/// Creates `release`, falling back to fetching it when the create fails.
///
/// Any create error triggers the fallback, not only conflicts.
///
/// # Errors
///
/// Returns the create error when the fallback fetch fails too.
pub async fn create_or_fetch_release(
    api: &dyn ReleaseApi,
    release: &NewRelease,
) -> Result<(Release, ReleaseOutcome)> {
    match api.create_release(release).await {
        Ok(created) => Ok((created, ReleaseOutcome::Created)),
        Err(create_err) => {
            warn!(
                version = %release.version,
                error = %create_err,
                "Create release failed, looking for an existing release"
            );
            match api.get_release(&release.version).await {
                Ok(existing) => Ok((existing, ReleaseOutcome::AlreadyExisted)),
                Err(get_err) => {
                    debug!(error = %get_err, "Fallback fetch failed");
                    Err(create_err)
                }
            }
        }
    }
}
