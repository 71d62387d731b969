//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    config::Config,
    models::LanguageRegistry,
    services::{ContestSolutionsQuery, JudgeOrchestrator, ProblemFetcher},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    pub db: PgPool,

    /// Process-wide, read-only language registry (C1)
    pub languages: Arc<LanguageRegistry>,

    /// Judge orchestrator handle (C5); enqueues work onto the worker pool
    pub orchestrator: JudgeOrchestrator,

    /// Contest solutions query (C7)
    pub contest_query: ContestSolutionsQuery,

    /// Problem fetcher (C3), used directly by handlers that need a fresh read
    pub problem_fetcher: Arc<ProblemFetcher>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        db: PgPool,
        languages: Arc<LanguageRegistry>,
        orchestrator: JudgeOrchestrator,
        contest_query: ContestSolutionsQuery,
        problem_fetcher: Arc<ProblemFetcher>,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                languages,
                orchestrator,
                contest_query,
                problem_fetcher,
                config,
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a reference to the language registry
    pub fn languages(&self) -> &LanguageRegistry {
        &self.inner.languages
    }

    /// Get a reference to the judge orchestrator
    pub fn orchestrator(&self) -> &JudgeOrchestrator {
        &self.inner.orchestrator
    }

    /// Get a reference to the contest solutions query
    pub fn contest_query(&self) -> &ContestSolutionsQuery {
        &self.inner.contest_query
    }

    /// Get a reference to the problem fetcher
    pub fn problem_fetcher(&self) -> &ProblemFetcher {
        &self.inner.problem_fetcher
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
