use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::{Task, TaskEnv};
use crate::error::{ExecutionError, FailureReason};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Captured result of a finished task script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Standard output, uninterpreted
    pub stdout: String,
    /// Exit code, `None` if the script was killed by a signal
    pub exit_code: Option<i32>,
}

impl TaskOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs located task scripts as blocking child processes.
#[derive(Debug, Clone, Default)]
pub struct TaskExecutor {
    timeout: Option<Duration>,
}

impl TaskExecutor {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Run `script` with `task.args` and wait for it to exit.
    ///
    /// A non-zero exit code is reported in the output, not as an error. Only
    /// failing to start the script, failing to wait for it, or running past
    /// the timeout produce an `ExecutionError`.
    pub fn run(
        &self,
        script: &Path,
        task: &Task,
        env: TaskEnv,
    ) -> Result<TaskOutput, ExecutionError> {
        let env = env.into_map();
        let mut argv = vec![script.to_string_lossy().to_string()];
        argv.extend(task.args.iter().cloned());

        tracing::debug!(task = %task.name, ?argv, ?env, "Running task");

        let fail = |reason: FailureReason, argv: Vec<String>, env: BTreeMap<String, String>| {
            ExecutionError {
                task: task.name.clone(),
                argv,
                env,
                reason,
            }
        };

        let mut cmd = Command::new(script);
        cmd.args(&task.args)
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => return Err(fail(FailureReason::Spawn(err), argv, env)),
        };

        let (stdout, status) = match self.timeout {
            None => match child.wait_with_output() {
                Ok(output) => (output.stdout, output.status),
                Err(err) => return Err(fail(FailureReason::Wait(err), argv, env)),
            },
            Some(limit) => match wait_with_deadline(&mut child, limit) {
                Ok(result) => result,
                Err(reason) => return Err(fail(reason, argv, env)),
            },
        };

        let output = TaskOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            exit_code: status.code(),
        };

        tracing::debug!(task = %task.name, stdout = %output.stdout, "Task finished");
        if !output.success() {
            tracing::warn!(
                "Task '{}' exited with status {}",
                task.name,
                output
                    .exit_code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string())
            );
        }

        Ok(output)
    }
}

/// Wait for `child` and its stdout, killing it once `limit` has elapsed.
///
/// The deadline also covers reading stdout: a background process the script
/// left behind can hold the pipe open after the script itself has exited.
fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
) -> Result<(Vec<u8>, ExitStatus), FailureReason> {
    let deadline = Instant::now() + limit;

    // Drain stdout on a separate thread so a chatty script cannot fill the
    // pipe and stall while we poll.
    let (tx, rx) = mpsc::channel();
    if let Some(mut pipe) = child.stdout.take() {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(buf);
        });
    } else {
        let _ = tx.send(Vec::new());
    }

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(FailureReason::TimedOut(limit));
            }
            Ok(None) => std::thread::sleep(POLL_INTERVAL),
            Err(err) => return Err(FailureReason::Wait(err)),
        }
    };

    // On timeout the reader stays detached until the pipe closes.
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(stdout) => Ok((stdout, status)),
        Err(RecvTimeoutError::Timeout) => Err(FailureReason::TimedOut(limit)),
        Err(RecvTimeoutError::Disconnected) => Ok((Vec::new(), status)),
    }
}
