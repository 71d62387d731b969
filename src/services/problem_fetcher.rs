//! Problem fetcher (C3) — pulls test cases and limits for a problem from the
//! external content service.

use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    constants::{DEFAULT_MEMORY_LIMIT_MB, DEFAULT_TIME_LIMIT_SECONDS},
    models::{ProblemSpec, RawTestCase},
};

#[derive(Debug, Deserialize)]
struct ProblemResponse {
    test_cases: Vec<RawTestCase>,
    time_limit: Option<u64>,
    memory_limit: Option<u64>,
}

/// Fetches problem specs (test cases, limits) from the content service, and
/// notifies it of accepted solves.
#[derive(Clone)]
pub struct ProblemFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ProblemFetcher {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build content-service HTTP client");

        Self { client, base_url }
    }

    /// `fetch(problem_id) -> ProblemSpec | missing`. Returns `None` on any
    /// non-2xx response or network error — callers map that to an RE
    /// termination of the submission, not to an application error.
    pub async fn fetch(&self, problem_id: &Uuid) -> Option<ProblemSpec> {
        let url = format!("{}/problems/{}", self.base_url, problem_id);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(problem_id = %problem_id, error = %err, "problem fetch: network error");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(problem_id = %problem_id, status = %response.status(), "problem fetch: non-2xx response");
            return None;
        }

        let parsed: ProblemResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(problem_id = %problem_id, error = %err, "problem fetch: malformed response body");
                return None;
            }
        };

        Some(ProblemSpec {
            test_cases: parsed.test_cases.into_iter().map(Into::into).collect(),
            time_limit_s: parsed.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),
            memory_limit_mib: parsed.memory_limit.unwrap_or(DEFAULT_MEMORY_LIMIT_MB),
        })
    }

    /// `POST /problems/solved/{id}?user_id=<author>` — best-effort; failure
    /// is logged by the caller and never fails the judging job.
    pub async fn notify_solved(&self, problem_id: &Uuid, author_id: &Uuid) -> Result<(), reqwest::Error> {
        let url = format!("{}/problems/solved/{}", self.base_url, problem_id);
        self.client
            .post(&url)
            .query(&[("user_id", author_id.to_string())])
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
