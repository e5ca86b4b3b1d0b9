//! In-memory [`ReleaseApi`] used by unit tests.

use crate::api::{
    CommitSpec, Deploy, NewDeploy, NewRelease, Organization, Project, Release, ReleaseApi,
};
use crate::config::SentryConfig;
use crate::connector::Connector;
use crate::error::{Error, Result};
use async_trait::async_trait;
use relicta_plugin::{CategorizedChanges, ConventionalCommit, ReleaseContext};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Remote operations the mock records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    GetOrganization,
    GetProject,
    CreateRelease,
    GetRelease,
    SetCommits,
    CreateDeploy,
    Finalize,
}

#[derive(Debug, Default)]
struct State {
    failing: Mutex<Vec<Op>>,
    calls: Mutex<Vec<Op>>,
    commits: Mutex<Vec<CommitSpec>>,
    deploys: Mutex<Vec<NewDeploy>>,
    releases: Mutex<Vec<NewRelease>>,
}

/// Records calls and fails the operations it is told to.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    state: Arc<State>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(ops: &[Op]) -> Self {
        let api = Self::new();
        api.state.failing.lock().unwrap().extend_from_slice(ops);
        api
    }

    pub fn calls(&self) -> Vec<Op> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn commits(&self) -> Vec<CommitSpec> {
        self.state.commits.lock().unwrap().clone()
    }

    pub fn deploys(&self) -> Vec<NewDeploy> {
        self.state.deploys.lock().unwrap().clone()
    }

    pub fn releases(&self) -> Vec<NewRelease> {
        self.state.releases.lock().unwrap().clone()
    }

    fn record(&self, op: Op) -> Result<()> {
        self.state.calls.lock().unwrap().push(op);
        if self.state.failing.lock().unwrap().contains(&op) {
            return Err(Error::remote_api(500, format!("{op:?} failed")));
        }
        Ok(())
    }

    fn release(version: &str) -> Release {
        Release {
            version: version.to_string(),
            url: Some(format!("https://sentry.io/releases/{version}/")),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ReleaseApi for MockApi {
    async fn get_organization(&self) -> Result<Organization> {
        self.record(Op::GetOrganization)?;
        Ok(Organization {
            id: "1".to_string(),
            slug: "my-org".to_string(),
            name: "My Org".to_string(),
        })
    }

    async fn get_project(&self, slug: &str) -> Result<Project> {
        self.record(Op::GetProject)?;
        Ok(Project {
            slug: slug.to_string(),
            ..Default::default()
        })
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        self.record(Op::CreateRelease)?;
        self.state.releases.lock().unwrap().push(release.clone());
        Ok(Self::release(&release.version))
    }

    async fn get_release(&self, version: &str) -> Result<Release> {
        self.record(Op::GetRelease)?;
        Ok(Self::release(version))
    }

    async fn set_commits(&self, _version: &str, commits: &[CommitSpec]) -> Result<()> {
        self.record(Op::SetCommits)?;
        self.state.commits.lock().unwrap().extend_from_slice(commits);
        Ok(())
    }

    async fn create_deploy(&self, _version: &str, deploy: &NewDeploy) -> Result<Deploy> {
        self.record(Op::CreateDeploy)?;
        self.state.deploys.lock().unwrap().push(deploy.clone());
        Ok(Deploy {
            id: "1".to_string(),
            environment: deploy.environment.clone(),
            name: deploy.name.clone(),
            ..Default::default()
        })
    }

    async fn finalize_release(&self, _version: &str) -> Result<()> {
        self.record(Op::Finalize)
    }
}

/// Hands out clones of one [`MockApi`] and counts connections.
#[derive(Debug, Default)]
pub struct MockConnector {
    pub api: MockApi,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(api: MockApi) -> Self {
        Self {
            api,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

impl Connector for MockConnector {
    fn connect(
        &self,
        _config: &SentryConfig,
        _cancel: CancellationToken,
    ) -> Result<Box<dyn ReleaseApi>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.api.clone()))
    }
}

/// A live-ready configuration for `my-org` / `my-project`.
pub fn config() -> SentryConfig {
    SentryConfig {
        auth_token: "test-token".to_string().into(),
        org: "my-org".to_string(),
        project: "my-project".to_string(),
        ..Default::default()
    }
}

/// A release with one feature and one fix.
pub fn release_context() -> ReleaseContext {
    ReleaseContext {
        version: "1.0.0".to_string(),
        tag_name: "v1.0.0".to_string(),
        branch: "main".to_string(),
        commit_sha: "abc123def456789".to_string(),
        changes: Some(CategorizedChanges {
            features: vec![ConventionalCommit {
                hash: "abc123".to_string(),
                commit_type: "feat".to_string(),
                description: "Add feature".to_string(),
                ..Default::default()
            }],
            fixes: vec![ConventionalCommit {
                hash: "def456".to_string(),
                commit_type: "fix".to_string(),
                description: "Fix bug".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }),
        ..Default::default()
    }
}
