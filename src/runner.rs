//! Subject invocation
//!
//! Runs `subject <fixture>` with stdout and stderr captured. Both pipes are
//! drained on helper threads so a chatty subject cannot block on a full pipe
//! while the wall-clock bound is being enforced. The readers hand their bytes
//! back over channels, which lets the same deadline bound the capture.

use std::io::{self, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::RunError;

const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Captured result of one subject invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
    /// Exit code, if the subject exited normally. Informational only.
    pub exit_code: Option<i32>,
}

type Pipe = mpsc::Receiver<io::Result<Vec<u8>>>;

/// Run `subject` against `fixture`, killing it if `timeout` elapses first.
///
/// The bound covers the whole capture: a descendant that keeps stdout or
/// stderr open after the subject exits also ends in [`RunError::Timeout`].
pub fn run_subject(
    subject: &Path,
    fixture: &Path,
    timeout: Option<Duration>,
) -> Result<ExecutionResult, RunError> {
    let start = Instant::now();
    let mut child = Command::new(subject)
        .arg(fixture)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(RunError::Spawn)?;

    let stdout = drain(child.stdout.take(), "stdout")?;
    let stderr = drain(child.stderr.take(), "stderr")?;

    let status = match timeout {
        Some(limit) => wait_with_deadline(&mut child, start, limit)?,
        None => child.wait().map_err(RunError::Wait)?,
    };
    let elapsed = start.elapsed();

    let result = ExecutionResult {
        stdout: collect(&stdout, "stdout", start, timeout)?,
        stderr: collect(&stderr, "stderr", start, timeout)?,
        elapsed,
        exit_code: status.code(),
    };
    tracing::debug!(
        fixture = %fixture.display(),
        exit_code = ?result.exit_code,
        elapsed_ms = elapsed.as_millis() as u64,
        "subject finished"
    );
    Ok(result)
}

fn drain<R>(pipe: Option<R>, stream: &'static str) -> Result<Pipe, RunError>
where
    R: Read + Send + 'static,
{
    let mut pipe = pipe.ok_or_else(|| RunError::Capture {
        stream,
        source: io::Error::new(io::ErrorKind::NotConnected, "stream was not piped"),
    })?;
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        let read = pipe.read_to_end(&mut buf).map(|_| buf);
        // The receiver is gone once the run has timed out
        let _ = tx.send(read);
    });
    Ok(rx)
}

fn collect(pipe: &Pipe, stream: &'static str, start: Instant, timeout: Option<Duration>) -> Result<String, RunError> {
    let received = match timeout {
        Some(limit) => pipe.recv_timeout(limit.saturating_sub(start.elapsed())),
        None => pipe.recv().map_err(RecvTimeoutError::from),
    };
    match received {
        Ok(Ok(bytes)) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Ok(Err(source)) => Err(RunError::Capture { stream, source }),
        Err(RecvTimeoutError::Timeout) => {
            let limit = timeout.unwrap_or_default();
            tracing::debug!(stream, limit_ms = limit.as_millis() as u64, "output still open at deadline");
            Err(RunError::Timeout(limit))
        }
        Err(RecvTimeoutError::Disconnected) => Err(RunError::Capture {
            stream,
            source: io::Error::other("reader thread exited without a result"),
        }),
    }
}

fn wait_with_deadline(child: &mut Child, start: Instant, limit: Duration) -> Result<ExitStatus, RunError> {
    loop {
        if let Some(status) = child.try_wait().map_err(RunError::Wait)? {
            return Ok(status);
        }
        let remaining = limit.saturating_sub(start.elapsed());
        if remaining.is_zero() {
            // Reader threads are detached; they finish once the pipes close.
            let _ = child.kill();
            let _ = child.wait();
            tracing::debug!(limit_ms = limit.as_millis() as u64, "subject timed out");
            return Err(RunError::Timeout(limit));
        }
        thread::sleep(remaining.min(POLL_INTERVAL));
    }
}
