//! kubectl client
//!
//! Thin wrapper that turns "list kinds" and "get resources of kind K" into
//! `kubectl` invocations and parses their `-o name` output.

use std::future::Future;

use tracing::debug;

use super::process::{CommandOutput, CommandRunner, TokioCommandRunner};
use crate::constants::kubectl::{DEFAULT_BINARY, EVENT_KINDS};
use crate::errors::{KubectlError, KubectlResult};

/// The two cluster operations the fetcher needs
pub trait KubeClient: Send + Sync + 'static {
    /// List the kinds that support `list`. When `namespaced_only` is true only
    /// kinds living in namespaces are returned, otherwise only cluster-scoped
    /// ones. Event kinds are always excluded.
    fn list_kinds(
        &self,
        namespaced_only: bool,
    ) -> impl Future<Output = KubectlResult<Vec<String>>> + Send;

    /// Names (`kind/name`) of every object of `kind`. No objects is `Ok(vec![])`.
    fn get_resources(&self, kind: &str)
        -> impl Future<Output = KubectlResult<Vec<String>>> + Send;
}

/// kubectl client running the real binary (or a substitute runner in tests)
#[derive(Debug, Clone)]
pub struct Kubectl<R = TokioCommandRunner> {
    runner: R,
    binary: String,
}

impl Kubectl<TokioCommandRunner> {
    /// Client for the `kubectl` found on `PATH`
    pub fn system() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> Kubectl<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            binary: DEFAULT_BINARY.to_string(),
        }
    }

    /// Use a different kubectl binary
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Resources of `kind` in an explicit namespace
    pub async fn get_namespaced_resources(
        &self,
        namespace: &str,
        kind: &str,
    ) -> KubectlResult<Vec<String>> {
        let output = self
            .output(vec![
                format!("--namespace={}", namespace),
                "get".to_string(),
                "--show-kind".to_string(),
                "--ignore-not-found".to_string(),
                "-o".to_string(),
                "name".to_string(),
                kind.to_string(),
            ])
            .await?;
        Ok(split_filter_and_sort(&output.stdout_string()))
    }

    async fn output(&self, args: Vec<String>) -> KubectlResult<CommandOutput> {
        let output = self
            .runner
            .run(&self.binary, &args, None)
            .await
            .map_err(|source| KubectlError::Spawn {
                program: self.binary.clone(),
                source,
            })?;

        if !output.success {
            return Err(KubectlError::CommandFailed {
                stderr: output.stderr_trimmed(),
            });
        }
        Ok(output)
    }
}

impl<R: CommandRunner> KubeClient for Kubectl<R> {
    async fn list_kinds(&self, namespaced_only: bool) -> KubectlResult<Vec<String>> {
        let output = self
            .output(vec![
                "api-resources".to_string(),
                "--verbs=list".to_string(),
                format!("--namespaced={}", namespaced_only),
                "-o".to_string(),
                "name".to_string(),
            ])
            .await?;

        let kinds = split_filter_and_sort(&output.stdout_string());
        debug!("kubectl listed {} kinds", kinds.len());
        Ok(kinds)
    }

    async fn get_resources(&self, kind: &str) -> KubectlResult<Vec<String>> {
        let output = self
            .output(vec![
                "get".to_string(),
                "--show-kind".to_string(),
                "--ignore-not-found".to_string(),
                "-o".to_string(),
                "name".to_string(),
                kind.to_string(),
            ])
            .await?;

        Ok(split_filter_and_sort(&output.stdout_string()))
    }
}

fn is_event_kind(line: &str) -> bool {
    EVENT_KINDS.contains(&line)
}

/// One entry per non-empty line, events removed, sorted
fn split_filter_and_sort(output: &str) -> Vec<String> {
    let mut lines: Vec<String> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !is_event_kind(line))
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}
