// src/scanner.rs

//! Output Scanner: line-buffered reads of a task's stdout/stderr with
//! readiness pattern matching, §4.2.

use std::time::Duration;

use regex::Regex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{ChildStderr, ChildStdout};

use crate::bus::{LogRecord, LogSender, StreamKind};
use crate::errors::{JorunError, Result};
use crate::handler::OnReady;

/// Read timeout per line, chosen so the scan loop remains cancellable
/// without busy-waiting.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Run the stdout/stderr pumps for one task until both streams close.
///
/// - If `pattern` is set, stdout lines are matched against it; the first
///   match fires `on_ready` and the scanner keeps forwarding output
///   ("print-and-scan"). If stdout closes with no match, this returns
///   `Err(JorunError::PatternMiss)`.
/// - If `pattern` is `None`, stdout is forwarded until it closes, at which
///   point `on_ready` fires (natural-exit readiness).
/// - `stderr` is `None` when the handler already merged it onto stdout
///   (`pattern_in_stderr`); otherwise it is pumped concurrently, print-only,
///   under the same task name.
pub async fn run(
    task_name: String,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    pattern: Option<Regex>,
    on_ready: OnReady,
    log_tx: LogSender,
) -> Result<()> {
    let stderr_pump = async {
        if let Some(stderr) = stderr {
            pump_print_only(&task_name, stderr, StreamKind::Stderr, &log_tx).await;
        }
    };

    let stdout_pump = pump_stdout(&task_name, stdout, pattern, on_ready, &log_tx);

    let (stdout_result, ()) = tokio::join!(stdout_pump, stderr_pump);
    stdout_result
}

async fn pump_stdout(
    task_name: &str,
    stdout: Option<ChildStdout>,
    pattern: Option<Regex>,
    on_ready: OnReady,
    log_tx: &LogSender,
) -> Result<()> {
    let Some(stdout) = stdout else {
        return Ok(());
    };

    let mut matched = pattern.is_none();
    let mut reader = BufReader::new(stdout);
    // Reused across read timeouts: a line that spans more than one
    // READ_TIMEOUT window must not lose the bytes already consumed from the
    // pipe into this buffer by an earlier, timed-out read_line call.
    let mut buf = String::new();

    loop {
        match read_line_with_timeout(&mut reader, &mut buf).await {
            ReadOutcome::Line => {
                let clean = clean_line(&buf);
                buf.clear();
                let _ = log_tx.send(LogRecord::new(task_name, StreamKind::Stdout, clean.clone()));

                if !matched {
                    if let Some(re) = &pattern {
                        let trimmed = clean.trim_end_matches(['\n', '\r']);
                        // Start-anchored, like Python's `re.match` (spec §4.2
                        // "regex.match"): an unanchored pattern only matches at
                        // the beginning of the line, not anywhere within it.
                        if re.find(trimmed).is_some_and(|m| m.start() == 0) {
                            matched = true;
                            on_ready.fire();
                        }
                    }
                }
            }
            ReadOutcome::Eof => break,
            ReadOutcome::TimedOut => continue,
            ReadOutcome::Io(_) => break,
        }
    }

    if pattern.is_some() && !matched {
        return Err(JorunError::PatternMiss {
            task: task_name.to_string(),
        });
    }

    if pattern.is_none() {
        on_ready.fire();
    }

    Ok(())
}

async fn pump_print_only(
    task_name: &str,
    stream: impl AsyncRead + Unpin,
    which: StreamKind,
    log_tx: &LogSender,
) {
    let mut reader = BufReader::new(stream);
    let mut buf = String::new();
    loop {
        match read_line_with_timeout(&mut reader, &mut buf).await {
            ReadOutcome::Line => {
                let clean = clean_line(&buf);
                buf.clear();
                let _ = log_tx.send(LogRecord::new(task_name, which, clean));
            }
            ReadOutcome::Eof | ReadOutcome::Io(_) => break,
            ReadOutcome::TimedOut => continue,
        }
    }
}

enum ReadOutcome {
    Line,
    Eof,
    TimedOut,
    Io(std::io::Error),
}

/// Reads into `buf`, appending across calls: a timeout leaves whatever
/// partial bytes `read_line` already consumed from the underlying pipe
/// sitting in `buf` so the next call picks up where this one left off,
/// instead of silently dropping a line split across a timeout boundary.
/// The caller must drain (and clear) `buf` on `ReadOutcome::Line`.
async fn read_line_with_timeout(
    reader: &mut BufReader<impl AsyncRead + Unpin>,
    buf: &mut String,
) -> ReadOutcome {
    match tokio::time::timeout(READ_TIMEOUT, reader.read_line(buf)).await {
        Ok(Ok(0)) => ReadOutcome::Eof,
        Ok(Ok(_)) => ReadOutcome::Line,
        Ok(Err(e)) => ReadOutcome::Io(e),
        Err(_) => ReadOutcome::TimedOut,
    }
}

/// Strip ANSI escapes, keeping the trailing LF (§4.2: "trailing LF kept
/// when forwarded").
fn clean_line(line: &str) -> String {
    let stripped = strip_ansi_escapes::strip(line.as_bytes());
    String::from_utf8_lossy(&stripped).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi_keeps_trailing_newline() {
        let raw = "\x1b[31mhello\x1b[0m\n";
        assert_eq!(clean_line(raw), "hello\n");
    }
}
