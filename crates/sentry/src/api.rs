//! Sentry release API surface.
//!
//! [`ReleaseApi`] is the seam between the orchestration logic and the wire:
//! [`crate::client::SentryClient`] implements it over HTTPS, tests implement
//! it in memory.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Formats a timestamp the way Sentry expects (RFC 3339, UTC, seconds).
#[must_use]
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Sentry ids arrive as strings at the top level and as integers when
/// nested (e.g. `Release.projects`); both decode to a string.
fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => id,
        Some(RawId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}

/// A Sentry organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    /// Numeric id as a string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// URL slug.
    pub slug: String,
    /// Display name.
    pub name: String,
}

/// A Sentry project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Numeric id as a string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Display name.
    pub name: String,
    /// URL slug.
    pub slug: String,
}

/// A Sentry release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Release {
    /// Release version, unique per organization.
    pub version: String,
    /// Abbreviated version shown in the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_version: Option<String>,
    /// VCS ref the release was created from.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub vcs_ref: Option<String>,
    /// URL pointing at the release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// When the release record was created.
    pub date_created: Option<DateTime<Utc>>,
    /// When the release was finalized.
    pub date_released: Option<DateTime<Utc>>,
    /// Projects the release belongs to.
    pub projects: Vec<Project>,
}

/// A deploy of a release to an environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deploy {
    /// Numeric id as a string.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// Target environment.
    pub environment: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// When the deploy started.
    pub date_started: Option<DateTime<Utc>>,
    /// When the deploy finished.
    pub date_finished: Option<DateTime<Utc>>,
}

/// A commit to associate with a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSpec {
    /// Commit hash.
    pub id: String,
    /// Repository name as known to Sentry.
    pub repository: String,
    /// Commit message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// Author name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Author email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

/// Body of a create-release request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRelease {
    /// Release version.
    pub version: String,
    /// VCS ref (commit SHA).
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub vcs_ref: Option<String>,
    /// URL pointing at the release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Project slugs.
    pub projects: Vec<String>,
    /// RFC 3339 start timestamp.
    pub date_started: String,
}

impl NewRelease {
    /// Creates a request for `version` in `projects`, started now.
    #[must_use]
    pub fn new(version: impl Into<String>, projects: Vec<String>) -> Self {
        Self {
            version: version.into(),
            vcs_ref: None,
            url: None,
            projects,
            date_started: timestamp(Utc::now()),
        }
    }

    /// Sets the VCS ref.
    #[must_use]
    pub fn with_ref(mut self, vcs_ref: impl Into<String>) -> Self {
        self.vcs_ref = Some(vcs_ref.into());
        self
    }
}

/// Body of a create-deploy request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeploy {
    /// Target environment.
    pub environment: String,
    /// Optional display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// RFC 3339 start timestamp.
    pub date_started: String,
    /// RFC 3339 finish timestamp.
    pub date_finished: String,
}

impl NewDeploy {
    /// Creates a deploy that started and finished now.
    #[must_use]
    pub fn new(environment: impl Into<String>, name: Option<String>) -> Self {
        let now = timestamp(Utc::now());
        Self {
            environment: environment.into(),
            name: name.filter(|n| !n.is_empty()),
            date_started: now.clone(),
            date_finished: now,
        }
    }
}

/// Remote operations on a Sentry organization's releases.
///
/// Every method performs exactly one request and never retries.
#[async_trait]
pub trait ReleaseApi: Send + Sync {
    /// Fetches the configured organization.
    async fn get_organization(&self) -> Result<Organization>;

    /// Fetches a project by slug.
    async fn get_project(&self, slug: &str) -> Result<Project>;

    /// Creates a release.
    async fn create_release(&self, release: &NewRelease) -> Result<Release>;

    /// Fetches a release by version.
    async fn get_release(&self, version: &str) -> Result<Release>;

    /// Associates commits with a release.
    async fn set_commits(&self, version: &str, commits: &[CommitSpec]) -> Result<()>;

    /// Records a deploy of a release.
    async fn create_deploy(&self, version: &str, deploy: &NewDeploy) -> Result<Deploy>;

    /// Marks a release as released now.
    async fn finalize_release(&self, version: &str) -> Result<()>;
}
