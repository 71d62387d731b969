//! AlgoJudge Tester — the judge subsystem of the AlgoJudge platform
//!
//! This service owns the submission lifecycle: intake, sandboxed execution
//! against a problem's test cases, verdict aggregation, and performance
//! analytics. The surrounding content service (users, posts, contests, ...)
//! is an external collaborator reached over HTTP.
//!
//! # Architecture
//!
//! - **Handlers**: HTTP request handlers (thin layer, C8)
//! - **Services**: business logic (C3, C5, C6, C7)
//! - **Benchmark**: the sandboxed execution engine (C2)
//! - **Db**: submission persistence (C4)
//! - **Models**: domain models and DTOs (C1's LanguageSpec, Submission, ProblemSpec)

pub mod benchmark;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
