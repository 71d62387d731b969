//! Submission service — the thin layer C8's handlers call into; delegates to
//! the submission store (C4), the judge orchestrator (C5), and the contest
//! solutions query (C7).

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::SubmissionRepository,
    error::{AppError, AppResult},
    models::{LanguageRegistry, Submission},
    services::{contest_solutions::ContestSolutionsQuery, judge_orchestrator::JudgeOrchestrator},
};

pub struct SubmissionService;

impl SubmissionService {
    /// Validate the language, then hand off to the orchestrator's `submit`.
    pub async fn create_submission(
        pool: &PgPool,
        orchestrator: &JudgeOrchestrator,
        languages: &LanguageRegistry,
        author_id: &Uuid,
        problem_id: Uuid,
        language: String,
        code: String,
    ) -> AppResult<Submission> {
        if code.trim().is_empty() {
            return Err(AppError::Validation("code must not be empty".to_string()));
        }

        if languages.lookup(&language).is_none() {
            return Err(AppError::Validation(format!(
                "unsupported language: {language}"
            )));
        }

        orchestrator
            .submit(pool, author_id, &problem_id, &language, &code)
            .await
    }

    pub async fn get_submission(pool: &PgPool, id: &Uuid) -> AppResult<Submission> {
        SubmissionRepository::get(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("submission not found".to_string()))
    }

    pub async fn list_by_problem(pool: &PgPool, problem_id: &Uuid) -> AppResult<Vec<Submission>> {
        SubmissionRepository::list_by_problem(pool, problem_id).await
    }

    pub async fn list_by_problem_and_user(
        pool: &PgPool,
        problem_id: &Uuid,
        author_id: &Uuid,
    ) -> AppResult<Vec<Submission>> {
        SubmissionRepository::list_by_problem_and_user(pool, problem_id, author_id).await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn list_contest_solutions(
        pool: &PgPool,
        contest_query: &ContestSolutionsQuery,
        contest_id: &Uuid,
        author_id_filter: Option<&Uuid>,
        problem_id_filter: Option<&Uuid>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Submission>> {
        contest_query
            .list(
                pool,
                contest_id,
                author_id_filter,
                problem_id_filter,
                offset,
                limit,
            )
            .await
    }
}
