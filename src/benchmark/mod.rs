//! Sandbox execution engine (C2)

pub mod runner;

pub use runner::{PerTestResult, RunOutcome, SandboxRunner};
