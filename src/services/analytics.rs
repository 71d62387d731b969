//! Performance analytics (C6) — faster-than percentile among accepted
//! submissions of the same problem.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{db::repositories::SubmissionRepository, error::AppResult};

pub struct PerformanceAnalytics;

impl PerformanceAnalytics {
    /// `percentile(problem_id, elapsed_s) -> float in [0,100]`.
    ///
    /// Let `N` be the count of AC submissions for the problem; if `N = 0`,
    /// return `100.0`. Otherwise let `S` be the count of AC submissions whose
    /// `time_used > elapsed_s`; return `100 * S / N`.
    ///
    /// The current submission is not yet recorded with its time when this is
    /// called, so the strictly-greater-than tie rule is a point estimate
    /// against the prior AC population, not a self-inclusive rank.
    pub async fn percentile(pool: &PgPool, problem_id: &Uuid, elapsed_s: f64) -> AppResult<f64> {
        let total = SubmissionRepository::count_accepted(pool, problem_id).await?;
        if total == 0 {
            return Ok(percentile_from_counts(0, 0));
        }

        let slower = SubmissionRepository::count_accepted_slower_than(pool, problem_id, elapsed_s)
            .await?;

        Ok(percentile_from_counts(total, slower))
    }
}

/// `N = 0` (no prior AC submissions) returns `100.0`; otherwise `100 * S / N`.
fn percentile_from_counts(total: i64, slower: i64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * slower as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_prior_submissions_is_full_percentile() {
        assert_eq!(percentile_from_counts(0, 0), 100.0);
    }

    #[test]
    fn fastest_among_prior_submissions_is_full_percentile() {
        assert_eq!(percentile_from_counts(4, 4), 100.0);
    }

    #[test]
    fn slowest_among_prior_submissions_is_zero_percentile() {
        assert_eq!(percentile_from_counts(4, 0), 0.0);
    }

    #[test]
    fn middle_of_the_pack() {
        assert_eq!(percentile_from_counts(4, 2), 50.0);
    }
}
