use crate::error::GitHubStarsError;
use crate::types::{GitHubUser, RateLimitResource, Stargazer};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// CSV header, in column order.
pub const CSV_HEADER: [&str; 6] = ["name", "email", "location", "company", "hireable", "url"];

/// A repository reference in `account/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub account: String,
    pub name: String,
}

impl FromStr for RepositoryRef {
    type Err = GitHubStarsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [account, name] if !account.is_empty() && !name.is_empty() => Ok(RepositoryRef {
                account: account.to_string(),
                name: name.to_string(),
            }),
            _ => Err(GitHubStarsError::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.name)
    }
}

/// One CSV output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StargazerRecord {
    pub name: String,
    pub email: String,
    pub location: String,
    pub company: String,
    pub hireable: String,
    pub url: String,
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

impl From<&GitHubUser> for StargazerRecord {
    fn from(user: &GitHubUser) -> Self {
        StargazerRecord {
            name: trimmed(&user.name),
            email: trimmed(&user.email),
            location: trimmed(&user.location),
            company: trimmed(&user.company),
            hireable: if user.hireable == Some(true) { "1" } else { "0" }.to_string(),
            url: trimmed(&user.html_url),
        }
    }
}

/// Rate limit state of a bucket at the time of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub remaining: u32,
    pub limit: u32,
    pub reset_time: DateTime<Utc>,
}

impl From<&RateLimitResource> for RateLimitStatus {
    fn from(resource: &RateLimitResource) -> Self {
        RateLimitStatus {
            remaining: resource.remaining,
            limit: resource.limit,
            reset_time: DateTime::from_timestamp(resource.reset, 0).unwrap_or_else(Utc::now),
        }
    }
}

/// A fetched profile together with the quota left after fetching it.
#[derive(Debug, Clone)]
pub struct UserLookup {
    pub user: GitHubUser,
    /// `None` when the response carried no rate limit headers.
    pub remaining: Option<u32>,
}

/// One page of the stargazer listing.
#[derive(Debug, Clone, Default)]
pub struct StargazerPage {
    pub users: Vec<Stargazer>,
    pub has_more: bool,
}

/// Outcome of a finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub repository: String,
    pub rows: usize,
    pub waits: usize,
}
