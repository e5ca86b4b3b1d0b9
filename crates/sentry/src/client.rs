//! HTTPS client for the Sentry release API.
//!
//! Requests go to `<url>/api/0/...` with bearer auth and JSON bodies. Each
//! request is bounded by the client timeout and aborts as soon as the
//! invocation's [`CancellationToken`] fires.

use crate::api::{
    CommitSpec, Deploy, NewDeploy, NewRelease, Organization, Project, Release, ReleaseApi,
    timestamp,
};
use crate::config::DEFAULT_URL;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_PREFIX: [&str; 2] = ["api", "0"];

/// Client for one Sentry organization.
#[derive(Debug, Clone)]
pub struct SentryClient {
    http: Client,
    base_url: Url,
    token: SecretString,
    org: String,
    cancel: CancellationToken,
}

impl SentryClient {
    /// Creates a client with the default timeout.
    ///
    /// An empty `base_url` means `https://sentry.io`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, token: SecretString, org: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, token, org, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL is invalid or the HTTP client
    /// cannot be built.
    pub fn with_timeout(
        base_url: &str,
        token: SecretString,
        org: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base = match base_url.trim() {
            "" => DEFAULT_URL,
            trimmed => trimmed,
        };
        let base_url = Url::parse(base).map_err(|e| {
            Error::config(
                format!("invalid Sentry URL '{base}': {e}"),
                "Set `url` to the base URL of your Sentry instance, e.g. https://sentry.io",
            )
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(
                format!("Sentry URL '{base}' cannot carry an API path"),
                "Use an http(s) URL such as https://sentry.io",
            ));
        }

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("relicta-sentry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                Error::config(
                    format!("failed to build HTTP client: {e}"),
                    "Check the TLS configuration of this system",
                )
            })?;

        Ok(Self {
            http,
            base_url,
            token,
            org: org.into(),
            cancel: CancellationToken::new(),
        })
    }

    /// Aborts in-flight and future requests once `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Builds `<base>/api/0/<segments>/`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::config("Sentry URL cannot carry an API path", "Use an http(s) URL"))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments)
            .push("");
        Ok(url)
    }

    fn release_endpoint(&self, version: &str, tail: Option<&str>) -> Result<Url> {
        let mut segments = vec!["organizations", self.org.as_str(), "releases", version];
        segments.extend(tail);
        self.endpoint(&segments)
    }

    async fn cancellable<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Error::transport("request cancelled")),
            output = fut => Ok(output),
        }
    }

    /// Sends one request and returns the body of a successful response.
    async fn send<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<Vec<u8>>
    where
        B: Serialize + Sync + ?Sized,
    {
        debug!(method = %method, url = %url, "Sentry API request");

        let mut request = self
            .http
            .request(method, url)
            .bearer_auth(self.token.expose_secret())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = self
            .cancellable(request.send())
            .await?
            .map_err(|e| Error::transport(format!("failed to execute request: {e}")))?;

        let status = response.status().as_u16();
        let body = self
            .cancellable(response.bytes())
            .await?
            .map_err(|e| Error::transport(format!("failed to read response: {e}")))?;

        debug!(status, bytes = body.len(), "Sentry API response");

        if status >= 400 {
            return Err(api_error(status, &body));
        }
        Ok(body.to_vec())
    }

    async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        decode(&self.send::<()>(Method::GET, url, None).await?)
    }
}

/// Extracts the `detail` field of an error body, falling back to the raw body.
fn api_error(status: u16, body: &[u8]) -> Error {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        detail: Option<String>,
    }

    let detail = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned());
    Error::remote_api(status, detail)
}

/// Decodes a JSON body; an empty body yields the default value.
fn decode<T>(body: &[u8]) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| Error::decode(e.to_string()))
}

#[async_trait]
impl ReleaseApi for SentryClient {
    async fn get_organization(&self) -> Result<Organization> {
        let url = self.endpoint(&["organizations", &self.org])?;
        self.get(url).await
    }

    async fn get_project(&self, slug: &str) -> Result<Project> {
        let url = self.endpoint(&["projects", &self.org, slug])?;
        self.get(url).await
    }

    async fn create_release(&self, release: &NewRelease) -> Result<Release> {
        let url = self.endpoint(&["organizations", &self.org, "releases"])?;
        decode(&self.send(Method::POST, url, Some(release)).await?)
    }

    async fn get_release(&self, version: &str) -> Result<Release> {
        let url = self.release_endpoint(version, None)?;
        self.get(url).await
    }

    async fn set_commits(&self, version: &str, commits: &[CommitSpec]) -> Result<()> {
        #[derive(Serialize)]
        struct SetCommits<'a> {
            commits: &'a [CommitSpec],
        }

        let url = self.release_endpoint(version, Some("commits"))?;
        self.send(Method::POST, url, Some(&SetCommits { commits }))
            .await
            .map(drop)
    }

    async fn create_deploy(&self, version: &str, deploy: &NewDeploy) -> Result<Deploy> {
        let url = self.release_endpoint(version, Some("deploys"))?;
        decode(&self.send(Method::POST, url, Some(deploy)).await?)
    }

    async fn finalize_release(&self, version: &str) -> Result<()> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Finalize {
            date_released: String,
        }

        let url = self.release_endpoint(version, None)?;
        let body = Finalize {
            date_released: timestamp(Utc::now()),
        };
        self.send(Method::PUT, url, Some(&body)).await.map(drop)
    }
}
