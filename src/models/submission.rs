//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::constants::verdicts;

/// Submission database row: one attempt by one author on one problem.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub created_by: Uuid,
    pub problem_id: Uuid,
    pub language: String,
    #[serde(rename = "code")]
    pub source_code: String,
    pub status: String,
    pub time_used: Option<f64>,
    pub memory_used: Option<i64>,
    pub faster_than: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Submission verdict, ordered by severity for aggregation purposes: a
/// submission's overall verdict is the maximum of its per-test verdicts
/// under this ordering (TLE > MLE > RE > WA > AC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    WrongAnswer,
    RuntimeError,
    MemoryLimitExceeded,
    TimeLimitExceeded,
}

impl Verdict {
    /// Get verdict as its wire/storage string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => verdicts::ACCEPTED,
            Self::WrongAnswer => verdicts::WRONG_ANSWER,
            Self::TimeLimitExceeded => verdicts::TIME_LIMIT_EXCEEDED,
            Self::MemoryLimitExceeded => verdicts::MEMORY_LIMIT_EXCEEDED,
            Self::RuntimeError => verdicts::RUNTIME_ERROR,
        }
    }

    /// Parse a verdict from its wire/storage string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            v if v == verdicts::ACCEPTED => Some(Self::Accepted),
            v if v == verdicts::WRONG_ANSWER => Some(Self::WrongAnswer),
            v if v == verdicts::TIME_LIMIT_EXCEEDED => Some(Self::TimeLimitExceeded),
            v if v == verdicts::MEMORY_LIMIT_EXCEEDED => Some(Self::MemoryLimitExceeded),
            v if v == verdicts::RUNTIME_ERROR => Some(Self::RuntimeError),
            _ => None,
        }
    }

    /// Whether this verdict means the solution was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_folds_to_highest_severity() {
        let per_test = [
            Verdict::Accepted,
            Verdict::WrongAnswer,
            Verdict::Accepted,
        ];
        let overall = per_test.into_iter().max().unwrap();
        assert_eq!(overall, Verdict::WrongAnswer);
    }

    #[test]
    fn tle_dominates_everything() {
        let per_test = [
            Verdict::TimeLimitExceeded,
            Verdict::Accepted,
            Verdict::MemoryLimitExceeded,
        ];
        let overall = per_test.into_iter().max().unwrap();
        assert_eq!(overall, Verdict::TimeLimitExceeded);
    }

    #[test]
    fn round_trips_through_string() {
        for v in [
            Verdict::Accepted,
            Verdict::WrongAnswer,
            Verdict::TimeLimitExceeded,
            Verdict::MemoryLimitExceeded,
            Verdict::RuntimeError,
        ] {
            assert_eq!(Verdict::from_str(v.as_str()), Some(v));
        }
    }
}
