use crate::error::{GitHubStarsError, Result};
use crate::models::{RateLimitStatus, RepositoryRef, StargazerPage, UserLookup};
use crate::source::StargazerSource;
use crate::types::{GitHubRepo, GitHubUser, RateLimitResponse, Stargazer};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
const PER_PAGE: u32 = 100;

pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: Url,
}

fn header_value<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<T>().ok())
}

/// Read the `X-RateLimit-*` headers of a response.
///
/// Returns `None` when `X-RateLimit-Remaining` is missing. A missing limit
/// defaults to 5000 and a missing reset to one hour from now.
pub fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitStatus> {
    let remaining = header_value::<u32>(headers, "X-RateLimit-Remaining")?;

    let limit = header_value::<u32>(headers, "X-RateLimit-Limit").unwrap_or(5000);

    let reset_time = header_value::<i64>(headers, "X-RateLimit-Reset")
        .map(|timestamp| DateTime::from_timestamp(timestamp, 0).unwrap_or_else(Utc::now))
        .unwrap_or_else(|| Utc::now() + chrono::Duration::hours(1));

    Some(RateLimitStatus {
        remaining,
        limit,
        reset_time,
    })
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Client against a non-default API root, e.g. `https://ghe.example.com/api/v3`.
    pub fn with_base_url(token: String, base_url: &str) -> Result<Self> {
        // Url::join replaces the last segment unless the base ends with '/'
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| GitHubStarsError::EnvError(format!("Invalid API URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("github-stars-export/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(GitHubClient {
            client,
            token,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| GitHubStarsError::ApiError(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn make_request(&self, url: Url) -> Result<Response> {
        debug!(%url, "GitHub API request");

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/vnd.github.v3+json")
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await?;

        match response.status() {
            reqwest::StatusCode::OK => Ok(response),
            reqwest::StatusCode::NOT_FOUND => {
                Err(GitHubStarsError::NotFound(format!("Resource not found: {}", url)))
            }
            reqwest::StatusCode::UNAUTHORIZED => {
                let error_text = response.text().await.unwrap_or_default();
                Err(GitHubStarsError::AuthError(format!("Bad credentials: {}", error_text)))
            }
            reqwest::StatusCode::FORBIDDEN => {
                let rate_limit = rate_limit_from_headers(response.headers());
                match rate_limit {
                    Some(status) if status.remaining == 0 => {
                        Err(GitHubStarsError::RateLimitExceeded {
                            reset_at: status.reset_time,
                        })
                    }
                    _ => {
                        let error_text = response.text().await.unwrap_or_default();
                        Err(GitHubStarsError::ApiError(format!("Forbidden: {}", error_text)))
                    }
                }
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(GitHubStarsError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    pub async fn get_repository_info(&self, owner: &str, repo: &str) -> Result<GitHubRepo> {
        let url = self.endpoint(&format!("repos/{}/{}", owner, repo))?;
        let response = self.make_request(url).await?;
        let repo_data: GitHubRepo = response.json().await?;
        Ok(repo_data)
    }

    /// Fetch a page of stargazers for a repository
    pub async fn fetch_stargazers_page(
        &self,
        repo: &RepositoryRef,
        page: u32,
    ) -> Result<StargazerPage> {
        let mut url = self.endpoint(&format!("repos/{}/{}/stargazers", repo.account, repo.name))?;
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());

        let response = self.make_request(url).await?;
        let users: Vec<Stargazer> = response.json().await?;
        let has_more = users.len() == PER_PAGE as usize;

        debug!(repository = %repo, page, count = users.len(), "Fetched stargazers page");

        Ok(StargazerPage { users, has_more })
    }

    pub async fn get_user(&self, login: &str) -> Result<UserLookup> {
        let url = self.endpoint(&format!("users/{}", login))?;
        let response = self.make_request(url).await?;
        let remaining = rate_limit_from_headers(response.headers()).map(|status| status.remaining);
        let user: GitHubUser = response.json().await?;
        Ok(UserLookup { user, remaining })
    }

    /// Current state of the `core` bucket. Does not count against the quota.
    pub async fn get_core_rate_limit(&self) -> Result<RateLimitStatus> {
        let url = self.endpoint("rate_limit")?;
        let response = self.make_request(url).await?;
        let body: RateLimitResponse = response.json().await?;
        Ok(RateLimitStatus::from(&body.resources.core))
    }
}

#[async_trait]
impl StargazerSource for GitHubClient {
    async fn lookup_repository(&self, repo: &RepositoryRef) -> Result<GitHubRepo> {
        self.get_repository_info(&repo.account, &repo.name).await
    }

    async fn stargazers_page(&self, repo: &RepositoryRef, page: u32) -> Result<StargazerPage> {
        self.fetch_stargazers_page(repo, page).await
    }

    async fn fetch_user(&self, login: &str) -> Result<UserLookup> {
        self.get_user(login).await
    }

    async fn fetch_core_rate_limit(&self) -> Result<RateLimitStatus> {
        self.get_core_rate_limit().await
    }
}
