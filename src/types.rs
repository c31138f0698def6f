use serde::Deserialize;

// GitHub API response structures
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRepo {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    pub stargazers_count: u32,
}

/// Entry of `GET /repos/{owner}/{repo}/stargazers`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Stargazer {
    pub login: String,
}

/// Full profile from `GET /users/{login}`. Every profile field is nullable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub hireable: Option<bool>,
    pub html_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    pub resources: RateLimitResources,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResources {
    pub core: RateLimitResource,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitResource {
    pub limit: u32,
    pub remaining: u32,
    pub reset: i64,
}
