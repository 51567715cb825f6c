//! External shell command reported through the completion channel.
//!
//! This is the collaborator behind `--exec`: the command runs on its own
//! thread and its exit status becomes the operation outcome. The last
//! non-empty line of stdout is the success message; on failure the last line
//! of stderr (or the exit status) is the error.

use super::channel::{CompletionSender, OperationError, OperationOutcome};
use super::trace::TraceContext;
use std::process::{Command, Output};
use std::thread::JoinHandle;

/// Runs `command_line` with the platform shell on a new thread.
///
/// The thread sends exactly one outcome and exits. The returned handle may be
/// dropped; the UI never joins it.
pub fn spawn_command(command_line: String, sender: CompletionSender) -> std::io::Result<JoinHandle<()>> {
    let trace_context = TraceContext::from_current();
    std::thread::Builder::new()
        .name("nestview-exec".into())
        .spawn(move || {
            let span = tracing::info_span!(
                "exec_command",
                command = %command_line,
                trace_id = trace_context.as_ref().map(|c| c.trace_id.as_str()),
                parent_span_id = trace_context.as_ref().map(|c| c.parent_span_id.as_str()),
            );
            let _guard = span.enter();

            let outcome = run(&command_line);
            match &outcome {
                Ok(message) => tracing::debug!(?message, "command succeeded"),
                Err(e) => tracing::debug!(error = %e, "command failed"),
            }
            sender.send(outcome);
        })
}

fn shell(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", command_line]);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", command_line]);
        cmd
    }
}

/// Runs the command to completion and converts its result.
pub fn run(command_line: &str) -> OperationOutcome {
    let output = shell(command_line)
        .stdin(std::process::Stdio::null())
        .output()
        .map_err(|e| OperationError::new(format!("failed to start command: {e}")))?;
    outcome_from_output(&output)
}

fn last_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(String::from)
}

fn outcome_from_output(output: &Output) -> OperationOutcome {
    if output.status.success() {
        Ok(last_line(&output.stdout))
    } else {
        let message = last_line(&output.stderr).unwrap_or_else(|| match output.status.code() {
            Some(code) => format!("command exited with status {code}"),
            None => "command terminated by signal".to_string(),
        });
        Err(OperationError::new(message))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::worker::channel::completion_channel;

    #[test]
    fn success_uses_last_stdout_line() {
        assert_eq!(run("printf 'a\\nsigned in\\n\\n'"), Ok(Some("signed in".into())));
        assert_eq!(run("true"), Ok(None));
    }

    #[test]
    fn failure_uses_stderr_or_status() {
        assert_eq!(run("echo nope >&2; exit 3"), Err(OperationError::new("nope")));
        assert_eq!(run("exit 4"), Err(OperationError::new("command exited with status 4")));
    }

    #[test]
    fn spawned_command_reports_through_channel() {
        let (tx, rx) = completion_channel();
        spawn_command("echo done".into(), tx).unwrap().join().unwrap();
        assert_eq!(rx.try_take(), Some(Ok(Some("done".into()))));
    }
}
