//! Sentry plugin configuration.
//!
//! Built from the host's config map with [`SentryConfig::from_map`]. The
//! connection settings fall back to the usual `SENTRY_*` environment
//! variables when the map leaves them unset.

use crate::version::DEFAULT_VERSION_FORMAT;
use relicta_plugin::{ConfigMap, ConfigParser};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Default Sentry instance.
pub const DEFAULT_URL: &str = "https://sentry.io";

/// Default deploy environment.
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Repository recorded on commits when none is configured.
pub const UNKNOWN_REPOSITORY: &str = "unknown";

/// Environment variable fallbacks for connection settings.
pub mod env {
    /// Auth token.
    pub const AUTH_TOKEN: &str = "SENTRY_AUTH_TOKEN";
    /// Organization slug.
    pub const ORG: &str = "SENTRY_ORG";
    /// Single project slug.
    pub const PROJECT: &str = "SENTRY_PROJECT";
    /// Base URL of the Sentry instance.
    pub const URL: &str = "SENTRY_URL";
}

/// Commit association settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitsConfig {
    /// Derive commits from the release changes.
    pub auto: bool,
    /// Repository name as known to Sentry (e.g. `org/repo`).
    pub repository: String,
}

impl Default for CommitsConfig {
    fn default() -> Self {
        Self {
            auto: true,
            repository: String::new(),
        }
    }
}

/// Deploy record settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployConfig {
    /// Environment the deploy targets.
    pub environment: String,
    /// Optional human-readable deploy name.
    pub name: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            name: String::new(),
        }
    }
}

/// Source map upload settings. Parsed for completeness; no hook uploads yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourcemapsConfig {
    /// Directory holding the source maps.
    pub path: String,
    /// URL prefix the maps are served under.
    pub url_prefix: String,
    /// Glob patterns to include.
    pub include: Vec<String>,
    /// Glob patterns to exclude.
    pub exclude: Vec<String>,
}

/// Complete Sentry plugin configuration.
#[derive(Debug, Clone)]
pub struct SentryConfig {
    /// Sentry auth token (bearer).
    pub auth_token: SecretString,
    /// Organization slug.
    pub org: String,
    /// Single project slug.
    pub project: String,
    /// Additional project slugs.
    pub projects: Vec<String>,
    /// Base URL of the Sentry instance.
    pub url: String,
    /// Template for the Sentry release version.
    pub version_format: String,
    /// Default environment name.
    pub environment: String,
    /// Associate commits after publishing.
    pub set_commits: bool,
    /// Commit association settings.
    pub commits: CommitsConfig,
    /// Create a deploy record after publishing.
    pub create_deploy: bool,
    /// Deploy record settings.
    pub deploy: DeployConfig,
    /// Upload source maps.
    pub upload_sourcemaps: bool,
    /// Source map settings.
    pub sourcemaps: SourcemapsConfig,
    /// Mark the release as released after publishing.
    pub finalize: bool,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            auth_token: SecretString::from(String::new()),
            org: String::new(),
            project: String::new(),
            projects: Vec::new(),
            url: DEFAULT_URL.to_string(),
            version_format: DEFAULT_VERSION_FORMAT.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            set_commits: true,
            commits: CommitsConfig::default(),
            create_deploy: true,
            deploy: DeployConfig::default(),
            upload_sourcemaps: false,
            sourcemaps: SourcemapsConfig::default(),
            finalize: true,
        }
    }
}

impl SentryConfig {
    /// Decodes the host's config map, applying defaults and env fallbacks.
    #[must_use]
    pub fn from_map(raw: &ConfigMap) -> Self {
        let parser = ConfigParser::new(raw);
        let environment = parser.get_string("environment", None, DEFAULT_ENVIRONMENT);

        let commits = parser
            .section("commits")
            .map(|commits| CommitsConfig {
                auto: commits.get_bool("auto", true),
                repository: commits.get_string("repository", None, ""),
            })
            .unwrap_or_default();

        let deploy = parser.section("deploy").map_or_else(
            || DeployConfig {
                environment: environment.clone(),
                name: String::new(),
            },
            |deploy| DeployConfig {
                environment: deploy.get_string("environment", None, &environment),
                name: deploy.get_string("name", None, ""),
            },
        );

        let sourcemaps = parser
            .section("sourcemaps")
            .map(|sm| SourcemapsConfig {
                path: sm.get_string("path", None, "./dist"),
                url_prefix: sm.get_string("url_prefix", None, "~/"),
                include: sm.get_string_list("include"),
                exclude: sm.get_string_list("exclude"),
            })
            .unwrap_or_default();

        Self {
            auth_token: SecretString::from(parser.get_string(
                "auth_token",
                Some(env::AUTH_TOKEN),
                "",
            )),
            org: parser.get_string("org", Some(env::ORG), ""),
            project: parser.get_string("project", Some(env::PROJECT), ""),
            projects: parser.get_string_list("projects"),
            url: parser.get_string("url", Some(env::URL), DEFAULT_URL),
            version_format: parser.get_string("version_format", None, DEFAULT_VERSION_FORMAT),
            environment,
            set_commits: parser.get_bool("set_commits", true),
            commits,
            create_deploy: parser.get_bool("create_deploy", true),
            deploy,
            upload_sourcemaps: parser.get_bool("upload_sourcemaps", false),
            sourcemaps,
            finalize: parser.get_bool("finalize", true),
        }
    }

    /// Whether an auth token is configured.
    #[must_use]
    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.expose_secret().is_empty()
    }

    /// Effective project list: `projects` in order without duplicates,
    /// followed by `project` unless it is already listed.
    #[must_use]
    pub fn effective_projects(&self) -> Vec<String> {
        let mut projects: Vec<String> = Vec::with_capacity(self.projects.len() + 1);
        let singular = (!self.project.is_empty()).then_some(&self.project);
        for project in self.projects.iter().chain(singular) {
            if !projects.contains(project) {
                projects.push(project.clone());
            }
        }
        projects
    }

    /// Repository recorded on associated commits.
    #[must_use]
    pub fn commit_repository(&self) -> &str {
        if self.commits.repository.is_empty() {
            UNKNOWN_REPOSITORY
        } else {
            &self.commits.repository
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn map(value: Value) -> ConfigMap {
        match value {
            Value::Object(map) => map,
            _ => ConfigMap::new(),
        }
    }

    fn without_sentry_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset(
            [env::AUTH_TOKEN, env::ORG, env::PROJECT, env::URL],
            f,
        );
    }

    #[test]
    fn test_from_map_all_fields() {
        let raw = map(json!({
            "auth_token": "test-token",
            "org": "my-org",
            "project": "my-project",
            "url": "https://custom.sentry.io",
            "version_format": "v{{.Version}}",
            "environment": "staging",
            "set_commits": false,
            "create_deploy": false,
            "upload_sourcemaps": true,
            "finalize": false
        }));
        let cfg = SentryConfig::from_map(&raw);

        assert_eq!(cfg.auth_token.expose_secret(), "test-token");
        assert_eq!(cfg.org, "my-org");
        assert_eq!(cfg.project, "my-project");
        assert_eq!(cfg.url, "https://custom.sentry.io");
        assert_eq!(cfg.version_format, "v{{.Version}}");
        assert_eq!(cfg.environment, "staging");
        assert!(!cfg.set_commits);
        assert!(!cfg.create_deploy);
        assert!(cfg.upload_sourcemaps);
        assert!(!cfg.finalize);
        // deploy environment inherits the top-level environment
        assert_eq!(cfg.deploy.environment, "staging");
    }

    #[test]
    fn test_from_map_defaults() {
        without_sentry_env(|| {
            let cfg = SentryConfig::from_map(&ConfigMap::new());
            assert!(!cfg.has_auth_token());
            assert_eq!(cfg.url, DEFAULT_URL);
            assert_eq!(cfg.version_format, "{{.Version}}");
            assert_eq!(cfg.environment, "production");
            assert!(cfg.set_commits);
            assert!(cfg.create_deploy);
            assert!(!cfg.upload_sourcemaps);
            assert!(cfg.finalize);
            assert!(cfg.commits.auto);
            assert_eq!(cfg.deploy.environment, "production");
        });
    }

    #[test]
    fn test_from_map_env_fallback() {
        temp_env::with_vars(
            [
                (env::AUTH_TOKEN, Some("env-token")),
                (env::ORG, Some("env-org")),
                (env::PROJECT, Some("env-project")),
                (env::URL, Some("https://self-hosted.example")),
            ],
            || {
                let cfg = SentryConfig::from_map(&map(json!({"org": "config-org"})));
                assert_eq!(cfg.auth_token.expose_secret(), "env-token");
                assert_eq!(cfg.org, "config-org");
                assert_eq!(cfg.project, "env-project");
                assert_eq!(cfg.url, "https://self-hosted.example");
            },
        );
    }

    #[test]
    fn test_from_map_multiple_projects() {
        let cfg = SentryConfig::from_map(&map(json!({"projects": ["frontend", "backend", "api"]})));
        assert_eq!(cfg.projects, ["frontend", "backend", "api"]);
    }

    #[test]
    fn test_from_map_commits_section() {
        let cfg = SentryConfig::from_map(&map(json!({
            "commits": {"auto": false, "repository": "org/repo"}
        })));
        assert!(!cfg.commits.auto);
        assert_eq!(cfg.commits.repository, "org/repo");
        assert_eq!(cfg.commit_repository(), "org/repo");
    }

    #[test]
    fn test_from_map_deploy_section() {
        let cfg = SentryConfig::from_map(&map(json!({
            "deploy": {"environment": "staging", "name": "Staging Deploy"}
        })));
        assert_eq!(cfg.deploy.environment, "staging");
        assert_eq!(cfg.deploy.name, "Staging Deploy");
    }

    #[test]
    fn test_from_map_sourcemaps_section() {
        let cfg = SentryConfig::from_map(&map(json!({
            "sourcemaps": {"include": ["*.js.map"]}
        })));
        assert_eq!(cfg.sourcemaps.path, "./dist");
        assert_eq!(cfg.sourcemaps.url_prefix, "~/");
        assert_eq!(cfg.sourcemaps.include, ["*.js.map"]);
        assert!(cfg.sourcemaps.exclude.is_empty());
    }

    #[test]
    fn test_effective_projects() {
        let cases: [(&str, Vec<&str>, Vec<&str>); 5] = [
            ("my-project", vec![], vec!["my-project"]),
            ("", vec!["frontend", "backend"], vec!["frontend", "backend"]),
            ("api", vec!["frontend", "backend"], vec!["frontend", "backend", "api"]),
            ("frontend", vec!["frontend", "backend"], vec!["frontend", "backend"]),
            ("", vec!["web", "web", "api"], vec!["web", "api"]),
        ];

        for (project, projects, expected) in cases {
            let cfg = SentryConfig {
                project: project.to_string(),
                projects: projects.iter().map(|p| (*p).to_string()).collect(),
                ..Default::default()
            };
            assert_eq!(cfg.effective_projects(), expected, "project={project:?}");
        }
    }

    #[test]
    fn test_commit_repository_defaults_to_unknown() {
        assert_eq!(SentryConfig::default().commit_repository(), "unknown");
    }

    #[test]
    fn test_debug_redacts_token() {
        let cfg = SentryConfig {
            auth_token: SecretString::from("sntrys_secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{cfg:?}").contains("sntrys_secret"));
    }
}
