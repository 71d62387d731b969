//! Solution (submission) handler implementations (C8)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{DEFAULT_LIMIT, DEFAULT_OFFSET},
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::Submission,
    services::SubmissionService,
    state::AppState,
};

use super::request::{ContestSolutionsQueryParams, CreateSolutionRequest};

/// `POST /solutions/` — intake a new submission; queues the judging job and
/// returns immediately without waiting for a verdict.
pub async fn create_solution(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateSolutionRequest>,
) -> AppResult<(StatusCode, Json<Submission>)> {
    payload.validate()?;

    let submission = SubmissionService::create_submission(
        state.db(),
        state.orchestrator(),
        state.languages(),
        &auth_user.id,
        payload.problem_id,
        payload.language,
        payload.code,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(submission)))
}

/// `GET /solutions/{id}`
pub async fn get_solution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Submission>> {
    let submission = SubmissionService::get_submission(state.db(), &id).await?;
    Ok(Json(submission))
}

/// `GET /solutions/by-problem/{problem_id}`
pub async fn list_by_problem(
    State(state): State<AppState>,
    Path(problem_id): Path<Uuid>,
) -> AppResult<Json<Vec<Submission>>> {
    let submissions = SubmissionService::list_by_problem(state.db(), &problem_id).await?;
    Ok(Json(submissions))
}

/// `GET /solutions/my/{problem_id}` — the authenticated caller's own
/// submissions for a problem.
pub async fn list_my_solutions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(problem_id): Path<Uuid>,
) -> AppResult<Json<Vec<Submission>>> {
    let submissions =
        SubmissionService::list_by_problem_and_user(state.db(), &problem_id, &auth_user.id)
            .await?;
    Ok(Json(submissions))
}

/// `GET /solutions/{contest_id}/solutions` — submissions within a contest's
/// task/participant sets, with optional filters and pagination.
pub async fn list_contest_solutions(
    State(state): State<AppState>,
    Path(contest_id): Path<Uuid>,
    Query(query): Query<ContestSolutionsQueryParams>,
) -> AppResult<Json<Vec<Submission>>> {
    let offset = query.offset.unwrap_or(DEFAULT_OFFSET).max(0);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);

    let submissions = SubmissionService::list_contest_solutions(
        state.db(),
        state.contest_query(),
        &contest_id,
        query.user_id.as_ref(),
        query.problem_id.as_ref(),
        offset,
        limit,
    )
    .await?;

    Ok(Json(submissions))
}
