//! Child process runner shared by the command-line tool adapters

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished child process
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Why a child process produced no [`ToolOutput`]
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessFailure {
    /// The program could not be started or waited on
    Spawn(String),
    /// The program was killed after exceeding the timeout
    TimedOut(Duration),
}

/// Run `program` with `args` to completion, optionally bounded by `timeout`.
///
/// The child is killed if the timeout elapses.
pub async fn run_tool(
    program: &str,
    args: &[String],
    timeout: Option<Duration>,
) -> Result<ToolOutput, ProcessFailure> {
    debug!("Running {} {}", program, args.join(" "));

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| ProcessFailure::Spawn(e.to_string()))?;

    let wait = child.wait_with_output();
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| ProcessFailure::TimedOut(limit))?,
        None => wait.await,
    }
    .map_err(|e| ProcessFailure::Spawn(e.to_string()))?;

    Ok(ToolOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
