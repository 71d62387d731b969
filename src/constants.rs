//! Application-wide constants
//!
//! This module contains constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// CONTENT SERVICE DEFAULTS
// =============================================================================

/// Default bounded timeout for outbound calls to the content service, in seconds
pub const DEFAULT_CONTENT_SERVICE_TIMEOUT_SECONDS: u64 = 5;

// =============================================================================
// SANDBOX / JUDGE DEFAULTS
// =============================================================================

/// Default problem time limit in seconds, used when the content service omits one
pub const DEFAULT_TIME_LIMIT_SECONDS: u64 = 10;

/// Default problem memory limit in MiB, used when the content service omits one
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 128;

/// CPU quota per sandbox container, as a fraction of one core
pub const CPU_LIMIT: f64 = 0.5;

/// Default size of the judge worker pool
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

/// Default bound on the judge work queue
pub const DEFAULT_WORKER_QUEUE_CAPACITY: usize = 256;

/// Default base directory for per-test-case scratch dirs, resolved on the
/// Docker daemon's host (not necessarily this process's own filesystem).
/// Matches the original's fixed `/shared_tmp` convention for
/// Docker-outside-of-Docker deployments.
pub const DEFAULT_DOCKER_SCRATCH_DIR: &str = "/shared_tmp";

// =============================================================================
// SUBMISSION STATUSES
// =============================================================================

/// Submission verdict strings, as stored and transmitted over the wire
pub mod verdicts {
    pub const PENDING: &str = "pending";
    pub const ACCEPTED: &str = "AC";
    pub const WRONG_ANSWER: &str = "WA";
    pub const TIME_LIMIT_EXCEEDED: &str = "TLE";
    pub const MEMORY_LIMIT_EXCEEDED: &str = "MLE";
    pub const RUNTIME_ERROR: &str = "RE";
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Default offset for the contest solutions query when the caller omits one
pub const DEFAULT_OFFSET: i64 = 0;

/// Default page size for the contest solutions query when the caller omits one
pub const DEFAULT_LIMIT: i64 = 20;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum source code size in bytes (1 MiB)
pub const MAX_SOURCE_CODE_SIZE: u64 = 1024 * 1024;

/// Maximum language key length
pub const MAX_LANGUAGE_KEY_LENGTH: u64 = 32;
