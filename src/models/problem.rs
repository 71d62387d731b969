//! Problem and test-case DTOs (C3's output)
//!
//! These exist only for the duration of one judging job — they are never
//! persisted by this service; the content service owns the data they
//! describe.

use serde::Deserialize;

/// One test case, as consumed by the sandbox runner.
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// The content service's raw per-test-case shape, before field coercion.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTestCase {
    pub input_data: String,
    pub output_data: String,
}

impl From<RawTestCase> for TestCase {
    fn from(raw: RawTestCase) -> Self {
        TestCase {
            input: raw.input_data,
            expected_output: raw.output_data,
        }
    }
}

/// A problem's judging contract: ordered test cases plus resource limits.
#[derive(Debug, Clone)]
pub struct ProblemSpec {
    pub test_cases: Vec<TestCase>,
    pub time_limit_s: u64,
    pub memory_limit_mib: u64,
}
