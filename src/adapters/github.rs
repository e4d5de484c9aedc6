use crate::config::auth::Credentials;
use crate::domain::model::{Issue, IssuePatch};
use crate::domain::ports::IssueTracker;
use crate::utils::error::{AssignerError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

const PER_PAGE: usize = 100;

#[derive(Debug, Deserialize)]
struct RawIssue {
    number: u64,
    html_url: String,
    #[serde(default)]
    title: String,
    body: Option<String>,
    #[serde(default)]
    labels: Vec<RawLabel>,
    #[serde(default)]
    assignees: Vec<RawUser>,
}

#[derive(Debug, Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    login: String,
}

impl From<RawIssue> for Issue {
    fn from(raw: RawIssue) -> Self {
        Issue {
            number: raw.number,
            url: raw.html_url,
            title: raw.title,
            body: raw.body.unwrap_or_default(),
            labels: raw.labels.into_iter().map(|l| l.name).collect(),
            assignees: raw.assignees.into_iter().map(|u| u.login).collect(),
        }
    }
}

/// GitHub REST API v3 client.
pub struct GitHubClient {
    client: Client,
    api_url: Url,
    credentials: Credentials,
}

impl GitHubClient {
    /// Builds a client for `api_url` (e.g. `https://api.github.com` or a GitHub Enterprise
    /// `/api/v3` root). Every request carries the given credentials.
    pub fn new(api_url: &str, credentials: Credentials) -> Result<Self> {
        let api_url = Url::parse(api_url).map_err(|e| AssignerError::InvalidConfigValueError {
            field: "github.api_url".to_string(),
            value: api_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        let client = Client::builder()
            .user_agent(concat!("ghia/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url,
            credentials,
        })
    }

    /// Joins `path` onto the API root without doubling slashes.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.as_str().trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Token(token) => request.header(AUTHORIZATION, format!("token {}", token)),
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    /// Fetches one page of open issues; an empty page ends the listing.
    async fn fetch_page(&self, repo: &str, page: usize) -> Result<Vec<Issue>> {
        let url = self.endpoint(&format!("repos/{}/issues", repo));
        tracing::debug!("GET {} (page {})", url, page);

        let response = self
            .authorize(self.client.get(&url))
            .query(&[
                ("state", "open".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| fetch_error(repo, e.to_string()))?;

        let response = ensure_success(response)
            .await
            .map_err(|message| fetch_error(repo, message))?;

        let raw: Vec<RawIssue> = response
            .json()
            .await
            .map_err(|e| fetch_error(repo, format!("unexpected response body: {}", e)))?;

        Ok(raw.into_iter().map(Issue::from).collect())
    }
}

fn fetch_error(repo: &str, message: String) -> AssignerError {
    AssignerError::IssueFetchError {
        repo: repo.to_string(),
        message,
    }
}

/// Turns a non-2xx response into a message carrying the status and GitHub's error text.
async fn ensure_success(response: Response) -> std::result::Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body);

    if detail.is_empty() {
        Err(status.to_string())
    } else {
        Err(format!("{} ({})", status, detail))
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    async fn list_issues(&self, repo: &str) -> Result<Vec<Issue>> {
        let mut issues = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(repo, page).await?;
            let last_page = batch.len() < PER_PAGE;
            issues.extend(batch);
            if last_page {
                break;
            }
            page += 1;
        }

        tracing::debug!("Listed {} issues from {} page(s)", issues.len(), page);
        Ok(issues)
    }

    async fn update_issue(&self, repo: &str, number: u64, patch: &IssuePatch) -> Result<()> {
        let url = self.endpoint(&format!("repos/{}/issues/{}", repo, number));
        tracing::debug!("PATCH {} {:?}", url, patch);

        let update_error = |message: String| AssignerError::IssueUpdateError {
            repo: repo.to_string(),
            number,
            message,
        };

        let response = self
            .authorize(self.client.patch(&url))
            .json(patch)
            .send()
            .await
            .map_err(|e| update_error(e.to_string()))?;

        ensure_success(response).await.map_err(update_error)?;
        Ok(())
    }
}
