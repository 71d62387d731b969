//! Solution (submission) request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// `POST /solutions/` body.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSolutionRequest {
    pub problem_id: Uuid,

    #[validate(length(min = 1, max = 32))]
    pub language: String,

    #[validate(length(min = 1, max = 1048576))]
    pub code: String,
}

/// `GET /solutions/{contest_id}/solutions` query parameters.
#[derive(Debug, Deserialize)]
pub struct ContestSolutionsQueryParams {
    pub user_id: Option<Uuid>,
    pub problem_id: Option<Uuid>,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}
