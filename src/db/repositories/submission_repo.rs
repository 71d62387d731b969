//! Submission store (C4)
//!
//! The submission store exclusively owns `Submission` rows: created in
//! `pending`, transitioning exactly once to a terminal status.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{constants::verdicts, error::AppResult, models::Submission};

/// Repository for submission database operations.
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a new submission in `pending` status.
    pub async fn create(
        pool: &PgPool,
        author_id: &Uuid,
        problem_id: &Uuid,
        language: &str,
        source_code: &str,
    ) -> AppResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submissions (created_by, problem_id, language, code, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, created_by, problem_id, language, code, status,
                      time_used, memory_used, faster_than, created_at, updated_at
            "#,
        )
        .bind(author_id)
        .bind(problem_id)
        .bind(language)
        .bind(source_code)
        .bind(verdicts::PENDING)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    /// Find a submission by id.
    pub async fn get(pool: &PgPool, id: &Uuid) -> AppResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, created_by, problem_id, language, code, status,
                   time_used, memory_used, faster_than, created_at, updated_at
            FROM submissions WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }

    /// Write a terminal status, its timing/memory/percentile figures, and bump
    /// `updated_at`. Returns the updated row, or `None` if the submission no
    /// longer exists (a "not updated" signal for the caller to treat as
    /// transient and not retry judging).
    #[allow(clippy::too_many_arguments)]
    pub async fn update_terminal(
        pool: &PgPool,
        id: &Uuid,
        status: &str,
        time_used: Option<f64>,
        memory_used: Option<i64>,
        faster_than: Option<f64>,
    ) -> AppResult<Option<Submission>> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            UPDATE submissions
            SET status = $2,
                time_used = $3,
                memory_used = $4,
                faster_than = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, created_by, problem_id, language, code, status,
                      time_used, memory_used, faster_than, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(time_used)
        .bind(memory_used)
        .bind(faster_than)
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }

    /// List all submissions for a problem.
    pub async fn list_by_problem(pool: &PgPool, problem_id: &Uuid) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, created_by, problem_id, language, code, status,
                   time_used, memory_used, faster_than, created_at, updated_at
            FROM submissions
            WHERE problem_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// List a single author's submissions for a problem.
    pub async fn list_by_problem_and_user(
        pool: &PgPool,
        problem_id: &Uuid,
        author_id: &Uuid,
    ) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, created_by, problem_id, language, code, status,
                   time_used, memory_used, faster_than, created_at, updated_at
            FROM submissions
            WHERE problem_id = $1 AND created_by = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(problem_id)
        .bind(author_id)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Submissions belonging to a contest's task set and participant set,
    /// with optional equality filters and pagination. Used by C7, which
    /// supplies `problem_ids`/`author_ids` from the content service.
    pub async fn list_for_contest(
        pool: &PgPool,
        problem_ids: &[Uuid],
        author_ids: &[Uuid],
        author_id_filter: Option<&Uuid>,
        problem_id_filter: Option<&Uuid>,
        offset: i64,
        limit: i64,
    ) -> AppResult<Vec<Submission>> {
        let submissions = sqlx::query_as::<_, Submission>(
            r#"
            SELECT id, created_by, problem_id, language, code, status,
                   time_used, memory_used, faster_than, created_at, updated_at
            FROM submissions
            WHERE problem_id = ANY($1)
              AND created_by = ANY($2)
              AND ($3::uuid IS NULL OR created_by = $3)
              AND ($4::uuid IS NULL OR problem_id = $4)
            ORDER BY created_at DESC, id
            OFFSET $5 LIMIT $6
            "#,
        )
        .bind(problem_ids)
        .bind(author_ids)
        .bind(author_id_filter)
        .bind(problem_id_filter)
        .bind(offset)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }

    /// Count of accepted submissions for a problem.
    pub async fn count_accepted(pool: &PgPool, problem_id: &Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"SELECT COUNT(*) FROM submissions WHERE problem_id = $1 AND status = $2"#,
        )
        .bind(problem_id)
        .bind(verdicts::ACCEPTED)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Count of accepted submissions for a problem strictly slower than
    /// `elapsed_s`, used by C6's percentile computation.
    pub async fn count_accepted_slower_than(
        pool: &PgPool,
        problem_id: &Uuid,
        elapsed_s: f64,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM submissions
            WHERE problem_id = $1 AND status = $2 AND time_used > $3
            "#,
        )
        .bind(problem_id)
        .bind(verdicts::ACCEPTED)
        .bind(elapsed_s)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }
}
