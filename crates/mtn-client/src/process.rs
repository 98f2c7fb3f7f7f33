//! mtn process runner.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{MtnError, MtnResult};

/// Read size for output pipes.
const CHUNK_SIZE: usize = 8 * 1024;

/// Text captured from the two output streams of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runner for mtn processes with optional timeout and cancellation.
///
/// Neither limit is set by default: a run lasts as long as mtn does.
#[derive(Debug, Clone, Default)]
pub struct MtnRunner {
    /// Cancellation signal receiver
    cancel_rx: Option<watch::Receiver<bool>>,
    /// Timeout
    timeout: Option<Duration>,
}

impl MtnRunner {
    /// Create a new runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cancellation signal.
    pub fn with_cancel(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Same limits without the cancellation signal.
    pub fn without_cancel(&self) -> Self {
        Self {
            cancel_rx: None,
            timeout: self.timeout,
        }
    }

    /// Whether the cancellation signal has already fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx
            .as_ref()
            .map(|cancel_rx| *cancel_rx.borrow())
            .unwrap_or(false)
    }

    /// Run mtn to completion.
    ///
    /// Both streams are appended to `captured` as they arrive, so whatever was
    /// read is still there when the run fails part way. `on_stdout` sees each
    /// stdout chunk right after it is read. Returns the exit code, `None` when
    /// the process was terminated by a signal. Nothing is launched once the
    /// cancellation signal has fired.
    pub async fn run<F>(
        &self,
        binary: &Path,
        args: &[String],
        captured: &mut CapturedOutput,
        mut on_stdout: F,
    ) -> MtnResult<Option<i32>>
    where
        F: FnMut(&str) + Send,
    {
        if self.is_cancelled() {
            info!("mtn cancelled before launch");
            return Err(MtnError::Cancelled);
        }

        debug!("Running mtn: {} {}", binary.display(), args.join(" "));

        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(MtnError::spawn)?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MtnError::internal("mtn stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| MtnError::internal("mtn stderr not captured"))?;

        let CapturedOutput {
            stdout: stdout_buf,
            stderr: stderr_buf,
        } = captured;

        let exchange = async {
            let mut ignore = |_: &str| {};
            let (stdout_res, stderr_res) = tokio::join!(
                pump(stdout, stdout_buf, &mut on_stdout),
                pump(stderr, stderr_buf, &mut ignore),
            );
            stdout_res?;
            stderr_res?;
            let status = child.wait().await?;
            Ok::<_, MtnError>(status.code())
        };

        let outcome = tokio::select! {
            result = exchange => result,
            _ = expired(self.timeout) => {
                let timeout = self.timeout.unwrap_or_default();
                warn!("mtn timed out after {:?}, killing process", timeout);
                Err(MtnError::Timeout(timeout))
            }
            _ = cancelled(self.cancel_rx.clone()) => {
                info!("mtn cancelled, killing process");
                Err(MtnError::Cancelled)
            }
        };

        if outcome.is_err() {
            if let Err(e) = child.kill().await {
                debug!("Failed to kill mtn process: {}", e);
            }
        }

        outcome
    }
}

/// Copy a pipe into `buffer` chunk by chunk until EOF.
///
/// A multibyte character split across two reads is held back until its
/// remaining bytes arrive, so `on_chunk` only sees whole characters.
async fn pump<R>(
    mut reader: R,
    buffer: &mut String,
    on_chunk: &mut (dyn FnMut(&str) + Send),
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut pending: Vec<u8> = Vec::new();
    loop {
        let n = reader.read(&mut chunk).await?;
        let complete = if n == 0 {
            pending.len()
        } else {
            pending.extend_from_slice(&chunk[..n]);
            complete_prefix_len(&pending)
        };

        if complete > 0 {
            let text = String::from_utf8_lossy(&pending[..complete]).into_owned();
            pending.drain(..complete);
            buffer.push_str(&text);
            on_chunk(&text);
        }

        if n == 0 {
            return Ok(());
        }
    }
}

/// Length of `bytes` without a trailing, not yet complete UTF-8 sequence.
fn complete_prefix_len(bytes: &[u8]) -> usize {
    let tail_start = bytes.len().saturating_sub(3);
    for i in (tail_start..bytes.len()).rev() {
        let width = match bytes[i] {
            // continuation byte, keep looking for the lead byte
            0x80..=0xBF => continue,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if i + width > bytes.len() { i } else { bytes.len() };
    }
    bytes.len()
}

/// Resolves once the timeout elapses, never without one.
async fn expired(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => std::future::pending().await,
    }
}

/// Resolves once the signal reads `true`, never without a signal.
async fn cancelled(cancel_rx: Option<watch::Receiver<bool>>) {
    let Some(mut cancel_rx) = cancel_rx else {
        return std::future::pending().await;
    };

    loop {
        let fired = *cancel_rx.borrow_and_update();
        if fired {
            return;
        }
        if cancel_rx.changed().await.is_err() {
            // Sender dropped without cancelling
            return std::future::pending().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output_order() {
        let captured = CapturedOutput {
            stdout: "out\n".to_string(),
            stderr: "err\n".to_string(),
        };
        assert_eq!(captured.combined(), "out\nerr\n");
    }

    #[tokio::test]
    async fn test_pump_reports_chunks() {
        let input: &[u8] = b"shot 1: a\nshot 2: b\n";
        let mut buffer = String::new();
        let mut seen = Vec::new();
        let mut on_chunk = |chunk: &str| seen.push(chunk.to_string());

        pump(input, &mut buffer, &mut on_chunk).await.unwrap();

        assert_eq!(buffer, "shot 1: a\nshot 2: b\n");
        assert_eq!(seen.concat(), buffer);
    }

    #[tokio::test]
    async fn test_pump_joins_split_characters() {
        let input = (&b"caf\xc3"[..]).chain(&b"\xa9\n"[..]);
        let mut buffer = String::new();
        let mut seen = Vec::new();
        let mut on_chunk = |chunk: &str| seen.push(chunk.to_string());

        pump(input, &mut buffer, &mut on_chunk).await.unwrap();

        assert_eq!(buffer, "caf\u{e9}\n");
        assert_eq!(seen, vec!["caf".to_string(), "\u{e9}\n".to_string()]);
    }

    #[tokio::test]
    async fn test_pump_flushes_truncated_tail() {
        let input: &[u8] = b"abc\xe2\x82";
        let mut buffer = String::new();
        let mut ignore = |_: &str| {};

        pump(input, &mut buffer, &mut ignore).await.unwrap();

        assert!(buffer.starts_with("abc"));
        assert!(buffer.ends_with('\u{fffd}'));
    }

    #[test]
    fn test_complete_prefix_len() {
        assert_eq!(complete_prefix_len(b"plain"), 5);
        assert_eq!(complete_prefix_len(b"caf\xc3"), 3);
        assert_eq!(complete_prefix_len(b"caf\xc3\xa9"), 5);
        assert_eq!(complete_prefix_len(b"x\xe2\x82"), 1);
        assert_eq!(complete_prefix_len(b"x\xf0\x9f\x8e"), 1);
        assert_eq!(complete_prefix_len(b"x\xf0\x9f\x8e\xac"), 5);
        assert_eq!(complete_prefix_len(b""), 0);
    }

    #[tokio::test]
    async fn test_cancelled_runner_does_not_launch() {
        let (tx, rx) = watch::channel(false);
        let runner = MtnRunner::new().with_cancel(rx);
        assert!(!runner.is_cancelled());
        tx.send(true).unwrap();
        assert!(runner.is_cancelled());
        assert!(!runner.without_cancel().is_cancelled());

        // the binary doesn't exist, so a launch attempt would be a Spawn error
        let mut captured = CapturedOutput::default();
        let err = runner
            .run(Path::new("/nonexistent/bin/mtn"), &[], &mut captured, |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, MtnError::Cancelled));
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let mut captured = CapturedOutput::default();
        let err = MtnRunner::new()
            .run(
                Path::new("/nonexistent/bin/mtn"),
                &[],
                &mut captured,
                |_| {},
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MtnError::Spawn(_)));
        assert_eq!(captured, CapturedOutput::default());
    }

    #[tokio::test]
    async fn test_cancel_signal_resolves() {
        let (tx, rx) = watch::channel(false);
        let waiter = tokio::spawn(cancelled(Some(rx)));
        tx.send(true).unwrap();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_no_timeout_never_expires() {
        let result =
            tokio::time::timeout(Duration::from_millis(20), expired(None)).await;
        assert!(result.is_err());
    }
}
