//! Shell command execution with stdin payload and timeout

use std::process::{Output, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn '{command}': {message}")]
    Spawn { command: String, message: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("exited with code {code}: {stderr}")]
    Exit { code: i32, stderr: String },
}

/// Quote a value for inclusion in a POSIX shell command line.
pub fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:@".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn shell(command_line: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", command_line]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command_line]);
        c
    }
}

/// Run `command_line` through the shell, writing `input` to its stdin.
///
/// The child is killed when the timeout fires. A non-zero exit status is
/// returned as [`ProcessError::Exit`].
pub async fn run_with_input(
    command_line: &str,
    input: &[u8],
    working_dir: Option<&str>,
    envs: &[(&str, String)],
    timeout: Option<Duration>,
) -> Result<Output, ProcessError> {
    let mut cmd = shell(command_line);
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    let mut child = cmd.spawn().map_err(|e| ProcessError::Spawn {
        command: command_line.to_string(),
        message: e.to_string(),
    })?;

    if let Some(mut stdin) = child.stdin.take() {
        // A child that exits without reading stdin closes the pipe early.
        if let Err(e) = stdin.write_all(input).await
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(ProcessError::Io(e.to_string()));
        }
    }

    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| ProcessError::Timeout(limit))?,
        None => child.wait_with_output().await,
    }
    .map_err(|e| ProcessError::Io(e.to_string()))?;

    if !output.status.success() {
        return Err(ProcessError::Exit {
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("security-auditor"), "security-auditor");
        assert_eq!(shell_quote("Core Review"), "'Core Review'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn test_stdin_is_forwarded() {
        let output = run_with_input("cat", b"hello", None, &[], None).await.unwrap();
        assert_eq!(output.stdout, b"hello");
    }

    #[tokio::test]
    async fn test_env_is_set() {
        let output = run_with_input(
            "printf %s \"$SQUAD_TEST\"",
            b"",
            None,
            &[("SQUAD_TEST", "value".to_string())],
            None,
        )
        .await
        .unwrap();
        assert_eq!(output.stdout, b"value");
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = run_with_input("echo boom >&2; exit 3", b"", None, &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ProcessError::Exit { code: 3, ref stderr } if stderr == "boom"));
    }

    #[tokio::test]
    async fn test_timeout() {
        let err = run_with_input(
            "sleep 5",
            b"",
            None,
            &[],
            Some(Duration::from_millis(100)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProcessError::Timeout(_)));
    }
}
