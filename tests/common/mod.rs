#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use github_stars_export::error::{GitHubStarsError, Result};
use github_stars_export::models::{RateLimitStatus, RepositoryRef, StargazerPage, UserLookup};
use github_stars_export::rate_limit::Waiter;
use github_stars_export::types::{GitHubRepo, GitHubUser, Stargazer};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Ordered log of calls shared between fakes.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

/// In-memory stand-in for the GitHub API.
pub struct FakeSource {
    pub repository: RepositoryRef,
    pub users: Vec<(GitHubUser, Option<u32>)>,
    pub page_size: usize,
    pub reset_time: DateTime<Utc>,
    pub fail_on_login: Option<String>,
    pub pages_requested: Mutex<Vec<u32>>,
    pub users_requested: Mutex<Vec<String>>,
    pub rate_limit_calls: Mutex<usize>,
    pub journal: Journal,
}

impl FakeSource {
    pub fn new(repository: &str, users: Vec<(GitHubUser, Option<u32>)>) -> Self {
        Self {
            repository: repository.parse().expect("valid repository"),
            users,
            page_size: 100,
            reset_time: Utc::now(),
            fail_on_login: None,
            pages_requested: Mutex::new(Vec::new()),
            users_requested: Mutex::new(Vec::new()),
            rate_limit_calls: Mutex::new(0),
            journal: Journal::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_reset_time(mut self, reset_time: DateTime<Utc>) -> Self {
        self.reset_time = reset_time;
        self
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn failing_on(mut self, login: &str) -> Self {
        self.fail_on_login = Some(login.to_string());
        self
    }

    pub fn pages_requested(&self) -> Vec<u32> {
        self.pages_requested.lock().unwrap().clone()
    }

    pub fn users_requested(&self) -> Vec<String> {
        self.users_requested.lock().unwrap().clone()
    }

    pub fn rate_limit_calls(&self) -> usize {
        *self.rate_limit_calls.lock().unwrap()
    }
}

#[async_trait]
impl github_stars_export::source::StargazerSource for FakeSource {
    async fn lookup_repository(&self, repo: &RepositoryRef) -> Result<GitHubRepo> {
        if *repo != self.repository {
            return Err(GitHubStarsError::NotFound(format!("Resource not found: {}", repo)));
        }
        Ok(GitHubRepo {
            name: repo.name.clone(),
            full_name: repo.to_string(),
            html_url: format!("https://github.com/{}", repo),
            stargazers_count: self.users.len() as u32,
        })
    }

    async fn stargazers_page(&self, _repo: &RepositoryRef, page: u32) -> Result<StargazerPage> {
        self.pages_requested.lock().unwrap().push(page);
        let start = (page as usize - 1) * self.page_size;
        let users: Vec<Stargazer> = self
            .users
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|(user, _)| Stargazer {
                login: user.login.clone(),
            })
            .collect();
        let has_more = users.len() == self.page_size;
        Ok(StargazerPage { users, has_more })
    }

    async fn fetch_user(&self, login: &str) -> Result<UserLookup> {
        self.users_requested.lock().unwrap().push(login.to_string());
        self.journal.lock().unwrap().push(format!("fetch_user:{}", login));
        if self.fail_on_login.as_deref() == Some(login) {
            return Err(GitHubStarsError::ApiError(format!("boom: {}", login)));
        }
        let (user, remaining) = self
            .users
            .iter()
            .find(|(user, _)| user.login == login)
            .cloned()
            .ok_or_else(|| GitHubStarsError::NotFound(login.to_string()))?;
        Ok(UserLookup { user, remaining })
    }

    async fn fetch_core_rate_limit(&self) -> Result<RateLimitStatus> {
        *self.rate_limit_calls.lock().unwrap() += 1;
        Ok(RateLimitStatus {
            remaining: 0,
            limit: 5000,
            reset_time: self.reset_time,
        })
    }
}

/// Records reset times instead of sleeping.
#[derive(Default)]
pub struct RecordingWaiter {
    pub waits: Mutex<Vec<DateTime<Utc>>>,
    pub journal: Journal,
}

impl RecordingWaiter {
    pub fn with_journal(journal: Journal) -> Self {
        Self {
            waits: Mutex::new(Vec::new()),
            journal,
        }
    }

    pub fn waits(&self) -> Vec<DateTime<Utc>> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Waiter for RecordingWaiter {
    async fn wait_until(&self, reset_at: DateTime<Utc>) {
        self.waits.lock().unwrap().push(reset_at);
        self.journal.lock().unwrap().push("wait".to_string());
    }
}

pub fn user(login: &str, name: Option<&str>) -> GitHubUser {
    GitHubUser {
        login: login.to_string(),
        name: name.map(str::to_string),
        html_url: Some(format!("https://github.com/{}", login)),
        ..Default::default()
    }
}

/// Output sink that only makes bytes visible when flushed, logging each
/// flushed line to the journal.
pub struct JournalSink {
    pending: Vec<u8>,
    journal: Journal,
}

impl JournalSink {
    pub fn new(journal: Journal) -> Self {
        Self {
            pending: Vec::new(),
            journal,
        }
    }
}

impl Write for JournalSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let flushed = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        let mut journal = self.journal.lock().unwrap();
        for line in flushed.lines() {
            journal.push(format!("flushed:{}", line));
        }
        Ok(())
    }
}
