//! Terminal capability lookup through `tput -S`
//!
//! Capability names are written to tput's stdin, one per line; its trimmed
//! stdout is the resolved control sequence.

use std::future::Future;

use crate::app::process::{CommandRunner, TokioCommandRunner};
use crate::constants::capabilities::TPUT_BINARY;
use crate::errors::{TerminalError, TerminalResult};

/// Resolves terminal capabilities
pub trait TermInfo: Send + Sync + 'static {
    /// Resolve one or more capabilities (e.g. `"el"`, `"cup 0 0"`)
    fn query(&self, capnames: &[&str]) -> impl Future<Output = TerminalResult<String>> + Send;

    /// Resolve a numeric capability (e.g. `"cols"`)
    fn query_int(&self, capname: &str) -> impl Future<Output = TerminalResult<i64>> + Send {
        async move {
            let value = self.query(&[capname]).await?;
            value
                .parse()
                .map_err(|source| TerminalError::InvalidInteger {
                    capname: capname.to_string(),
                    value,
                    source,
                })
        }
    }
}

/// [`TermInfo`] backed by the `tput` binary
#[derive(Debug, Clone, Default)]
pub struct TPut<R = TokioCommandRunner> {
    runner: R,
}

impl TPut<TokioCommandRunner> {
    /// tput found on `PATH`
    pub fn system() -> Self {
        Self::new(TokioCommandRunner)
    }
}

impl<R: CommandRunner> TPut<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> TermInfo for TPut<R> {
    async fn query(&self, capnames: &[&str]) -> TerminalResult<String> {
        let stdin: String = capnames
            .iter()
            .map(|capname| format!("{}\n", capname))
            .collect();

        let output = self
            .runner
            .run(TPUT_BINARY, &["-S".to_string()], Some(&stdin))
            .await
            .map_err(|source| TerminalError::Spawn {
                program: TPUT_BINARY.to_string(),
                source,
            })?;

        if !output.success {
            return Err(TerminalError::CommandFailed {
                code: output.code,
                stderr: output.stderr_trimmed(),
            });
        }
        Ok(output.stdout_string().trim().to_string())
    }
}
