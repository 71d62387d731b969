//! Contest solutions query (C7) — filters submissions by a contest's task
//! set and participant set, joining external roster data.

use std::time::Duration;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::repositories::SubmissionRepository, error::AppResult, models::Submission};

#[derive(Debug, Deserialize)]
struct TaskRef {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct ParticipantRef {
    keycloak_id: Uuid,
}

/// Joins the submission store with the content service's contest
/// task/participant rosters.
#[derive(Clone)]
pub struct ContestSolutionsQuery {
    client: reqwest::Client,
    base_url: String,
}

impl ContestSolutionsQuery {
    pub fn new(base_url: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build content-service HTTP client");

        Self { client, base_url }
    }

    /// `list(contest_id, filters, offset, limit) -> [Submission]`.
    ///
    /// Network or upstream failures surface as a single `AppError::Upstream`
    /// — no partial results.
    #[allow(clippy::too_many_arguments)]
    pub async fn list(
        &self,
        pool: &PgPool,
        contest_id: &Uuid,
        author_id_filter: Option<&Uuid>,
        problem_id_filter: Option<&Uuid>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Submission>> {
        let tasks_url = format!("{}/contests/{}/tasks", self.base_url, contest_id);
        let participants_url = format!("{}/contests/{}/participants", self.base_url, contest_id);

        let tasks: Vec<TaskRef> = self
            .client
            .get(&tasks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let participants: Vec<ParticipantRef> = self
            .client
            .get(&participants_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let problem_ids: Vec<Uuid> = tasks.into_iter().map(|t| t.id).collect();
        let author_ids: Vec<Uuid> = participants.into_iter().map(|p| p.keycloak_id).collect();

        SubmissionRepository::list_for_contest(
            pool,
            &problem_ids,
            &author_ids,
            author_id_filter,
            problem_id_filter,
            offset,
            limit,
        )
        .await
    }
}
