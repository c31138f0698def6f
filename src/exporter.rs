use crate::error::Result;
use crate::models::{ExportSummary, RepositoryRef, StargazerRecord, CSV_HEADER};
use crate::rate_limit::{Waiter, RATE_LIMIT_RESET_THRESHOLD};
use crate::source::StargazerSource;
use futures::TryStreamExt;
use std::io::Write;
use tracing::{debug, info, warn};

/// Writes the stargazers of a repository as CSV, one row per user.
pub struct StargazerExporter<S, W> {
    source: S,
    waiter: W,
    threshold: u32,
}

impl<S: StargazerSource, W: Waiter> StargazerExporter<S, W> {
    pub fn new(source: S, waiter: W) -> Self {
        Self {
            source,
            waiter,
            threshold: RATE_LIMIT_RESET_THRESHOLD,
        }
    }

    /// Wait for the reset once fewer than `threshold` calls remain.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn waiter(&self) -> &W {
        &self.waiter
    }

    /// Export every stargazer of `repo` to `output`.
    ///
    /// The header is written after the repository lookup succeeds and each
    /// row is flushed as soon as it is written. Any API error aborts the
    /// export; rows already written stay in `output`.
    pub async fn export<O: Write>(&self, repo: &RepositoryRef, output: O) -> Result<ExportSummary> {
        let info = self.source.lookup_repository(repo).await?;
        info!(
            repository = %info.full_name,
            stargazers = info.stargazers_count,
            "Exporting stargazers"
        );

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(output);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        let mut rows = 0;
        let mut waits = 0;
        let mut stargazers = self.source.enumerate_stargazers(repo);

        while let Some(stargazer) = stargazers.try_next().await? {
            let lookup = self.source.fetch_user(&stargazer.login).await?;

            if let Some(remaining) = lookup.remaining {
                if remaining < self.threshold {
                    let status = self.source.fetch_core_rate_limit().await?;
                    warn!(
                        remaining,
                        reset_at = %status.reset_time,
                        "Rate limit low, waiting for reset"
                    );
                    self.waiter.wait_until(status.reset_time).await;
                    waits += 1;
                }
            }

            writer.serialize(StargazerRecord::from(&lookup.user))?;
            writer.flush()?;
            rows += 1;

            debug!(login = %stargazer.login, rows, "Wrote stargazer");
        }

        Ok(ExportSummary {
            repository: repo.to_string(),
            rows,
            waits,
        })
    }
}
