//! The release event handed to plugins.

use serde::{Deserialize, Serialize};

/// A conventional commit as categorized by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionalCommit {
    /// Full commit hash.
    pub hash: String,
    /// Conventional type (`feat`, `fix`, ...).
    #[serde(rename = "type")]
    pub commit_type: String,
    /// Optional scope in parentheses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Commit description (subject without type and scope).
    pub description: String,
    /// Whether the commit is marked as breaking.
    pub breaking: bool,
    /// Author name, if the host resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Author email, if the host resolved it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
}

/// Commits of a release grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizedChanges {
    /// `feat` commits.
    pub features: Vec<ConventionalCommit>,
    /// `fix` commits.
    pub fixes: Vec<ConventionalCommit>,
    /// Commits carrying a breaking change.
    pub breaking: Vec<ConventionalCommit>,
    /// Everything else.
    pub other: Vec<ConventionalCommit>,
}

impl CategorizedChanges {
    /// Iterates all commits in category order: features, fixes, breaking, other.
    pub fn iter(&self) -> impl Iterator<Item = &ConventionalCommit> {
        self.features
            .iter()
            .chain(&self.fixes)
            .chain(&self.breaking)
            .chain(&self.other)
    }

    /// Total number of commits across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len() + self.fixes.len() + self.breaking.len() + self.other.len()
    }

    /// Whether no category carries a commit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The completed release event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseContext {
    /// Version being released (without tag prefix).
    pub version: String,
    /// Version of the previous release, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version: Option<String>,
    /// Git tag created for the release.
    pub tag_name: String,
    /// Bump kind chosen by the host (`major`, `minor`, `patch`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<String>,
    /// Branch the release was cut from.
    pub branch: String,
    /// Commit the release tag points at.
    pub commit_sha: String,
    /// Remote URL of the repository, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    /// Commits included in the release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<CategorizedChanges>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(hash: &str) -> ConventionalCommit {
        ConventionalCommit {
            hash: hash.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_iter_preserves_category_order() {
        let changes = CategorizedChanges {
            features: vec![commit("f1"), commit("f2")],
            fixes: vec![commit("x1")],
            breaking: vec![commit("b1")],
            other: vec![commit("o1")],
        };
        let hashes: Vec<&str> = changes.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, ["f1", "f2", "x1", "b1", "o1"]);
        assert_eq!(changes.len(), 5);
    }

    #[test]
    fn test_empty_changes() {
        assert!(CategorizedChanges::default().is_empty());
    }

    #[test]
    fn test_deserialize_partial_context() {
        let ctx: ReleaseContext = serde_json::from_str(
            r#"{"version":"1.0.0","tag_name":"v1.0.0","changes":{"fixes":[{"hash":"abc","type":"fix","description":"Fix bug"}]}}"#,
        )
        .unwrap();
        assert_eq!(ctx.version, "1.0.0");
        assert_eq!(ctx.tag_name, "v1.0.0");
        assert!(ctx.commit_sha.is_empty());
        let changes = ctx.changes.unwrap();
        assert_eq!(changes.fixes[0].commit_type, "fix");
        assert!(changes.features.is_empty());
    }
}
