//! Judge orchestrator (C5) — drives the submission lifecycle: intake ->
//! fetch problem -> run sandbox -> aggregate -> persist; enqueues work to a
//! background worker pool.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

use crate::{
    benchmark::SandboxRunner,
    config::WorkerConfig,
    constants::verdicts,
    db::repositories::SubmissionRepository,
    error::AppResult,
    models::Submission,
    services::{analytics::PerformanceAnalytics, problem_fetcher::ProblemFetcher},
};

/// Drives submissions from intake through a pool of background workers.
/// Each worker pulls submission ids off a bounded channel and judges them
/// independently; the HTTP-facing `submit` call never waits on judging.
#[derive(Clone)]
pub struct JudgeOrchestrator {
    tx: mpsc::Sender<Uuid>,
}

impl JudgeOrchestrator {
    /// Spawn the worker pool and return a handle for enqueuing jobs. Each
    /// worker shares the same `PgPool` handle (itself an internal connection
    /// pool) rather than opening a dedicated connection, and the same
    /// `SandboxRunner`/`ProblemFetcher`, both of which are cheaply cloneable.
    pub fn spawn(
        pool: PgPool,
        sandbox: SandboxRunner,
        fetcher: Arc<ProblemFetcher>,
        worker_config: &WorkerConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<Uuid>(worker_config.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));

        for worker_id in 0..worker_config.pool_size {
            let rx = rx.clone();
            let pool = pool.clone();
            let sandbox = sandbox.clone();
            let fetcher = fetcher.clone();

            tokio::spawn(async move {
                tracing::info!(worker_id, "judge worker started");
                loop {
                    let next = { rx.lock().await.recv().await };
                    match next {
                        Some(submission_id) => {
                            Self::judge(&pool, &sandbox, &fetcher, &submission_id).await;
                        }
                        None => break,
                    }
                }
                tracing::info!(worker_id, "judge worker shut down");
            });
        }

        Self { tx }
    }

    /// `submit(author_id, payload)` — persists a PENDING submission and
    /// enqueues an asynchronous `judge(id)` unit. Returns immediately without
    /// waiting for judging; the enqueue is fire-and-forget relative to the
    /// HTTP response.
    pub async fn submit(
        &self,
        pool: &PgPool,
        author_id: &Uuid,
        problem_id: &Uuid,
        language: &str,
        code: &str,
    ) -> AppResult<Submission> {
        let submission = SubmissionRepository::create(pool, author_id, problem_id, language, code)
            .await?;

        if let Err(err) = self.tx.try_send(submission.id) {
            tracing::error!(submission_id = %submission.id, error = %err, "failed to enqueue judging job");
        }

        Ok(submission)
    }

    /// Run one submission to completion. Never propagates an error to its
    /// caller — every failure mode here ends in either a terminal write or a
    /// logged no-op, per the orchestrator's error-boundary role.
    async fn judge(
        pool: &PgPool,
        sandbox: &SandboxRunner,
        fetcher: &ProblemFetcher,
        submission_id: &Uuid,
    ) {
        tracing::info!(event = "judge.intake", submission_id = %submission_id);

        let submission = match SubmissionRepository::get(pool, submission_id).await {
            Ok(Some(submission)) => submission,
            Ok(None) => {
                tracing::warn!(event = "judge.intake", submission_id = %submission_id, "submission missing, best-effort RE");
                Self::mark_terminal(pool, submission_id, verdicts::RUNTIME_ERROR, None, None).await;
                return;
            }
            Err(err) => {
                tracing::error!(event = "judge.intake", submission_id = %submission_id, error = %err, "failed to load submission");
                return;
            }
        };

        // Idempotency: tolerate being invoked more than once on a terminal
        // row by no-oping once a terminal state is observed.
        if submission.status != verdicts::PENDING {
            tracing::info!(event = "judge.intake", submission_id = %submission_id, status = %submission.status, "already terminal, skipping");
            return;
        }

        tracing::info!(event = "judge.fetch_problem", submission_id = %submission_id);
        let problem = match fetcher.fetch(&submission.problem_id).await {
            Some(problem) => problem,
            None => {
                tracing::warn!(event = "judge.fetch_problem", submission_id = %submission_id, "problem missing, RE");
                Self::mark_terminal(pool, submission_id, verdicts::RUNTIME_ERROR, None, None).await;
                return;
            }
        };

        tracing::info!(event = "judge.run", submission_id = %submission_id);
        let outcome = sandbox
            .run(
                &submission.source_code,
                &submission.language,
                &problem.test_cases,
                problem.time_limit_s,
                problem.memory_limit_mib,
            )
            .await;

        let (time_used, faster_than) = if outcome.overall.is_accepted() {
            if let Err(err) = fetcher
                .notify_solved(&submission.problem_id, &submission.created_by)
                .await
            {
                tracing::warn!(event = "judge.run", submission_id = %submission_id, error = %err, "solved-notification failed (non-fatal)");
            }

            // The first test case's elapsed time, per the percentile contract.
            let first_elapsed = outcome
                .per_test
                .first()
                .map(|result| result.time)
                .unwrap_or(outcome.max_time);

            let percentile =
                match PerformanceAnalytics::percentile(pool, &submission.problem_id, first_elapsed)
                    .await
                {
                    Ok(percentile) => Some(percentile),
                    Err(err) => {
                        tracing::error!(event = "judge.run", submission_id = %submission_id, error = %err, "percentile computation failed");
                        None
                    }
                };

            (Some(first_elapsed), percentile)
        } else {
            (Some(outcome.max_time), None)
        };

        tracing::info!(event = "judge.persist", submission_id = %submission_id, status = %outcome.overall.as_str());
        Self::mark_terminal(
            pool,
            submission_id,
            outcome.overall.as_str(),
            time_used,
            faster_than,
        )
        .await;
    }

    async fn mark_terminal(
        pool: &PgPool,
        submission_id: &Uuid,
        status: &str,
        time_used: Option<f64>,
        faster_than: Option<f64>,
    ) {
        match SubmissionRepository::update_terminal(
            pool,
            submission_id,
            status,
            time_used,
            None,
            faster_than,
        )
        .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                tracing::warn!(event = "judge.persist", submission_id = %submission_id, "submission vanished before terminal write");
            }
            Err(err) => {
                tracing::error!(event = "judge.persist", submission_id = %submission_id, error = %err, "failed to persist terminal state, leaving submission in PENDING for operator reprocessing");
            }
        }
    }
}
