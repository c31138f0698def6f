use crate::error::{GitHubStarsError, Result};
use crate::models::{RateLimitStatus, RepositoryRef, StargazerPage, UserLookup};
use crate::types::{GitHubRepo, Stargazer};
use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// The slice of the hosting API the exporter needs.
#[async_trait]
pub trait StargazerSource: Send + Sync {
    /// Look up a repository, failing with `NotFound` if it does not exist.
    async fn lookup_repository(&self, repo: &RepositoryRef) -> Result<GitHubRepo>;

    /// Fetch one 1-based page of stargazers.
    async fn stargazers_page(&self, repo: &RepositoryRef, page: u32) -> Result<StargazerPage>;

    /// Fetch a user's full profile and the quota remaining after the call.
    async fn fetch_user(&self, login: &str) -> Result<UserLookup>;

    /// Fetch the state of the `core` rate limit bucket.
    async fn fetch_core_rate_limit(&self) -> Result<RateLimitStatus>;

    /// Lazily walk every stargazer of `repo` in API order.
    ///
    /// Page `n + 1` is only requested once page `n` has been consumed and
    /// reported more results. The stream ends at the first error.
    fn enumerate_stargazers<'a>(
        &'a self,
        repo: &'a RepositoryRef,
    ) -> BoxStream<'a, Result<Stargazer>> {
        stream::try_unfold(Some(1u32), move |page| async move {
            let Some(page) = page else {
                return Ok(None);
            };
            let batch = self.stargazers_page(repo, page).await?;
            let next = batch.has_more.then_some(page + 1);
            Ok::<_, GitHubStarsError>(Some((stream::iter(batch.users.into_iter().map(Ok)), next)))
        })
        .try_flatten()
        .boxed()
    }
}
