// src/exec/command.rs

//! Shell command execution for tasks and transforms declared in TOML.

use std::path::Path;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::{PipedagError, Result};

/// Build a shell command appropriate for the platform.
fn shell(cmd: &str, cwd: &Path) -> Command {
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };
    command.current_dir(cwd).kill_on_drop(true);
    command
}

/// Run `cmd` in `cwd`, logging its output line by line.
pub async fn run_command(cmd: &str, cwd: &Path) -> Result<()> {
    info!(cmd, "running command");

    let mut child = shell(cmd, cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning `{cmd}`"))?;

    // Always consume stderr so buffers don't fill.
    if let Some(stderr) = child.stderr.take() {
        let cmd = cmd.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(cmd = %cmd, "stderr: {}", line);
            }
        });
    }

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            info!(cmd, "{}", line);
        }
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{cmd}`"))?;

    if status.success() {
        Ok(())
    } else {
        Err(PipedagError::CommandFailed {
            cmd: cmd.to_string(),
            code: status.code().unwrap_or(-1),
        })
    }
}

/// Pipe `input` through `cmd` and return what it writes to stdout.
pub async fn filter_through(cmd: &str, cwd: &Path, input: Vec<u8>) -> Result<Vec<u8>> {
    let mut child = shell(cmd, cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("spawning `{cmd}`"))?;

    if let Some(mut stdin) = child.stdin.take() {
        // Write from a separate task so a chatty filter can't deadlock on a full pipe.
        let cmd = cmd.to_string();
        tokio::spawn(async move {
            if let Err(err) = stdin.write_all(&input).await {
                debug!(cmd = %cmd, error = %err, "filter closed stdin early");
            }
        });
    }

    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for `{cmd}`"))?;

    if !output.status.success() {
        return Err(PipedagError::CommandFailed {
            cmd: cmd.to_string(),
            code: output.status.code().unwrap_or(-1),
        });
    }

    Ok(output.stdout)
}
