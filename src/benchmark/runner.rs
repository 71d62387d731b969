//! Sandbox runner (C2) — materializes code, launches one container per test
//! case, enforces resource limits, captures output, and classifies the
//! outcome.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bollard::container::{
    Config as ContainerConfig, CreateContainerOptions, LogsOptions, RemoveContainerOptions,
    WaitContainerOptions,
};
use bollard::models::HostConfig;
use bollard::Docker;
use futures::StreamExt;
use uuid::Uuid;

use crate::models::{LanguageRegistry, TestCase, Verdict};

/// CPU quota period, in microseconds, against which `CPU_LIMIT` is applied.
const CPU_PERIOD_MICROS: i64 = 100_000;

/// Maps a container's terminal state to a verdict. No exit code (wait
/// failure, stream error, or timeout) is TLE regardless of the OOM flag; an
/// OOM kill otherwise dominates any exit code, including a clean `0` exit a
/// process may log on its way out. Output is compared with surrounding
/// whitespace trimmed from both sides.
fn classify(exit_code: Option<i64>, oom_killed: bool, output: &str, expected_output: &str) -> Verdict {
    match exit_code {
        None => Verdict::TimeLimitExceeded,
        Some(_) if oom_killed => Verdict::MemoryLimitExceeded,
        Some(code) if code != 0 => Verdict::RuntimeError,
        Some(_) if output.trim() == expected_output.trim() => Verdict::Accepted,
        Some(_) => Verdict::WrongAnswer,
    }
}

/// The per-test-case outcome the contract returns.
#[derive(Debug, Clone)]
pub struct PerTestResult {
    pub status: Verdict,
    /// Elapsed wall-clock time, in seconds, from launch to wait-return.
    pub time: f64,
    pub output: String,
}

/// The aggregate outcome of running a submission against a problem's test cases.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub overall: Verdict,
    pub max_time: f64,
    pub per_test: Vec<PerTestResult>,
}

/// Sandboxed execution engine. One instance is shared across judge workers;
/// `Docker` and `LanguageRegistry` are both safe to share by reference.
#[derive(Clone)]
pub struct SandboxRunner {
    docker: Docker,
    languages: Arc<LanguageRegistry>,
    /// Base directory for per-test-case scratch dirs, resolved on the Docker
    /// daemon's host — see `DockerConfig::scratch_dir`.
    scratch_dir: String,
}

impl SandboxRunner {
    pub fn new(docker: Docker, languages: Arc<LanguageRegistry>, scratch_dir: String) -> Self {
        Self {
            docker,
            languages,
            scratch_dir,
        }
    }

    /// Run `code` against every test case, in order, returning the aggregate
    /// outcome. Never raises — an unexpected sandbox failure for a given test
    /// case becomes a synthetic RE for that test case, per the "sandbox
    /// runner never raises for user-program problems" propagation policy.
    pub async fn run(
        &self,
        code: &str,
        language_key: &str,
        test_cases: &[TestCase],
        time_limit_s: u64,
        memory_limit_mib: u64,
    ) -> RunOutcome {
        let Some(spec) = self.languages.lookup(language_key) else {
            tracing::warn!(language = language_key, "unsupported language");
            return RunOutcome {
                overall: Verdict::RuntimeError,
                max_time: 0.0,
                per_test: vec![PerTestResult {
                    status: Verdict::RuntimeError,
                    time: 0.0,
                    output: format!("Unsupported language: {language_key}"),
                }],
            };
        };

        if test_cases.is_empty() {
            return RunOutcome {
                overall: Verdict::Accepted,
                max_time: 0.0,
                per_test: Vec::new(),
            };
        }

        let mut per_test = Vec::with_capacity(test_cases.len());
        let mut overall = Verdict::Accepted;
        let mut max_time = 0.0f64;

        for (index, test_case) in test_cases.iter().enumerate() {
            let result = match self
                .run_one_test_case(spec, code, test_case, time_limit_s, memory_limit_mib)
                .await
            {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(test_index = index, error = %err, "sandbox failure on test case");
                    PerTestResult {
                        status: Verdict::RuntimeError,
                        time: 0.0,
                        output: format!("sandbox error: {err}"),
                    }
                }
            };

            max_time = max_time.max(result.time);
            overall = overall.max(result.status);
            per_test.push(result);
        }

        RunOutcome {
            overall,
            max_time,
            per_test,
        }
    }

    async fn run_one_test_case(
        &self,
        spec: &crate::models::LanguageSpec,
        code: &str,
        test_case: &TestCase,
        time_limit_s: u64,
        memory_limit_mib: u64,
    ) -> anyhow::Result<PerTestResult> {
        let scratch = tempfile::Builder::new()
            .prefix("algojudge-")
            .tempdir_in(&self.scratch_dir)?;
        let source_path = scratch.path().join(&spec.file_name);
        tokio::fs::write(&source_path, code).await?;

        let quoted_input = shlex::try_quote(&test_case.input)
            .map_err(|_| anyhow::anyhow!("test input contains a NUL byte, cannot shell-quote"))?
            .into_owned();

        let command = spec
            .command_template
            .replace("{file}", &spec.file_name)
            .replace("{input}", &quoted_input);

        let container_name = format!("algojudge-{}", Uuid::new_v4());
        let memory_bytes = (memory_limit_mib * 1024 * 1024) as i64;

        let host_config = HostConfig {
            binds: Some(vec![format!("{}:/app:rw", scratch.path().display())]),
            memory: Some(memory_bytes),
            memory_swap: Some(memory_bytes),
            oom_kill_disable: Some(false),
            cpu_period: Some(CPU_PERIOD_MICROS),
            cpu_quota: Some((CPU_PERIOD_MICROS as f64 * crate::constants::CPU_LIMIT) as i64),
            ..Default::default()
        };

        let config = ContainerConfig {
            image: Some(spec.image.clone()),
            cmd: Some(vec!["sh".to_string(), "-c".to_string(), command]),
            working_dir: Some("/app".to_string()),
            host_config: Some(host_config),
            ..Default::default()
        };

        let created = self
            .docker
            .create_container(
                Some(CreateContainerOptions {
                    name: container_name.as_str(),
                    platform: None,
                }),
                config,
            )
            .await?;
        let container_id = created.id;

        let outcome = self
            .run_and_classify(&container_id, &test_case.expected_output, time_limit_s)
            .await;

        // Cleanup is unconditional regardless of how run_and_classify resolved.
        let _ = self
            .docker
            .remove_container(
                &container_id,
                Some(RemoveContainerOptions {
                    force: true,
                    ..Default::default()
                }),
            )
            .await;

        // `scratch` is dropped here, recursively deleting the directory.
        outcome
    }

    async fn run_and_classify(
        &self,
        container_id: &str,
        expected_output: &str,
        time_limit_s: u64,
    ) -> anyhow::Result<PerTestResult> {
        let start = Instant::now();

        self.docker.start_container::<String>(container_id, None).await?;

        let wait_future = async {
            let mut stream = self
                .docker
                .wait_container(container_id, None::<WaitContainerOptions<String>>);
            stream.next().await
        };

        let wait_outcome = tokio::time::timeout(Duration::from_secs(time_limit_s), wait_future).await;
        let elapsed = start.elapsed().as_secs_f64();

        let exit_code: Option<i64> = match wait_outcome {
            Ok(Some(Ok(response))) => Some(response.status_code),
            // Stream error, empty stream, or deadline exceeded all leave the
            // container in an indeterminate state; force a kill so it reaches
            // a terminal state before we inspect it.
            Ok(Some(Err(_))) | Ok(None) | Err(_) => {
                let _ = self.docker.kill_container::<String>(container_id, None).await;
                None
            }
        };

        let oom_killed = self
            .docker
            .inspect_container(container_id, None)
            .await
            .ok()
            .and_then(|inspect| inspect.state)
            .and_then(|state| state.oom_killed)
            .unwrap_or(false);

        let output = self.collect_output(container_id).await.unwrap_or_default();
        let status = classify(exit_code, oom_killed, &output, expected_output);

        Ok(PerTestResult {
            status,
            time: elapsed,
            output,
        })
    }

    async fn collect_output(&self, container_id: &str) -> anyhow::Result<String> {
        let mut stream = self.docker.logs(
            container_id,
            Some(LogsOptions::<String> {
                stdout: true,
                stderr: true,
                ..Default::default()
            }),
        );

        let mut output = String::new();
        while let Some(chunk) = stream.next().await {
            output.push_str(&chunk?.to_string());
        }

        Ok(output)
    }

    /// Best-effort pre-pull of every image the language registry requires.
    /// Failures are logged, never fatal: a submission referring to a missing
    /// image simply surfaces as RE through the per-test classifier.
    pub async fn pull_required_images(&self) {
        use bollard::image::CreateImageOptions;

        for image in self.languages.required_images() {
            tracing::info!(image = %image, "pulling sandbox image");
            let mut stream = self.docker.create_image(
                Some(CreateImageOptions {
                    from_image: image.as_str(),
                    ..Default::default()
                }),
                None,
                None,
            );

            while let Some(progress) = stream.next().await {
                if let Err(err) = progress {
                    tracing::warn!(image = %image, error = %err, "failed to pull sandbox image");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quoting_neutralizes_special_characters() {
        let dangerous = "hello; rm -rf / $(echo pwned)";
        let quoted = shlex::try_quote(dangerous).unwrap();
        assert!(quoted.starts_with('\''));
        assert!(quoted.contains(dangerous));
    }

    #[test]
    fn command_template_substitution() {
        let template = "echo {input} | python /app/{file}";
        let quoted_input = shlex::try_quote("1 2").unwrap().into_owned();
        let command = template
            .replace("{file}", "code.py")
            .replace("{input}", &quoted_input);
        assert_eq!(command, "echo '1 2' | python /app/code.py");
    }

    #[test]
    fn no_exit_code_is_time_limit_exceeded() {
        assert_eq!(classify(None, false, "", "anything"), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn no_exit_code_is_tle_even_if_oom_flag_somehow_set() {
        assert_eq!(classify(None, true, "", "anything"), Verdict::TimeLimitExceeded);
    }

    #[test]
    fn oom_dominates_nonzero_exit_code() {
        assert_eq!(
            classify(Some(137), true, "partial", "expected"),
            Verdict::MemoryLimitExceeded
        );
    }

    #[test]
    fn oom_dominates_clean_exit_code() {
        assert_eq!(
            classify(Some(0), true, "expected", "expected"),
            Verdict::MemoryLimitExceeded
        );
    }

    #[test]
    fn nonzero_exit_without_oom_is_runtime_error() {
        assert_eq!(classify(Some(1), false, "", "expected"), Verdict::RuntimeError);
    }

    #[test]
    fn matching_output_is_accepted() {
        assert_eq!(
            classify(Some(0), false, "  42\n", "42"),
            Verdict::Accepted
        );
    }

    #[test]
    fn mismatched_output_is_wrong_answer() {
        assert_eq!(classify(Some(0), false, "41", "42"), Verdict::WrongAnswer);
    }
}
