//! Commit extraction from the release changes.

use crate::api::{CommitSpec, timestamp};
use crate::config::SentryConfig;
use chrono::{DateTime, Utc};
use relicta_plugin::ReleaseContext;

/// Builds the commits to associate with a release.
///
/// Commits are taken in category order (features, fixes, breaking, other).
/// Each record is stamped with the extraction time, not the commit time.
#[must_use]
pub fn extract_commits(config: &SentryConfig, ctx: &ReleaseContext) -> Vec<CommitSpec> {
    extract_commits_at(config, ctx, Utc::now())
}

/// [`extract_commits`] with an explicit timestamp.
#[must_use]
pub fn extract_commits_at(
    config: &SentryConfig,
    ctx: &ReleaseContext,
    at: DateTime<Utc>,
) -> Vec<CommitSpec> {
    let Some(changes) = ctx.changes.as_ref() else {
        return Vec::new();
    };

    let repository = config.commit_repository();
    let stamp = timestamp(at);

    changes
        .iter()
        .map(|commit| CommitSpec {
            id: commit.hash.clone(),
            repository: repository.to_string(),
            message: commit.description.clone(),
            author_name: commit.author.clone(),
            author_email: commit.author_email.clone(),
            timestamp: stamp.clone(),
        })
        .collect()
}
