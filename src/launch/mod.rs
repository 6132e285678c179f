//! Launching a target CLI and streaming its output.
//!
//! launch(spec) -> spawn child (stdout/stderr piped)
//!              -> stdout relay + stderr relay + optional indicator (tokio tasks)
//!              -> wait for both relays, stop the indicator, wait for the child
//!              -> Ok(()) on a zero exit status, LaunchError otherwise
//!
//! Nothing here knows about aliases or flag spellings; see `convention` for
//! how argument lists are shaped.

pub mod convention;
pub mod relay;

use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::LaunchError;

pub use convention::build_args;
pub use relay::{Console, RelayState};

/// Time between indicator frames.
pub const INDICATOR_INTERVAL: Duration = Duration::from_millis(500);

/// Everything needed to start one child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub executable: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.executable).chain(self.args.iter());
        f.write_str(&shell_words::join(words))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    /// Animate "running <cli>..." until the first output line.
    pub indicator: bool,
    pub interval: Duration,
}

impl LaunchOptions {
    /// Indicator on only when stdout is an interactive terminal, so piped
    /// output never contains escape sequences.
    pub fn detect() -> Self {
        Self {
            indicator: std::io::stdout().is_terminal(),
            interval: INDICATOR_INTERVAL,
        }
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            indicator: false,
            interval: INDICATOR_INTERVAL,
        }
    }
}

/// Run `spec` to completion, relaying its output to `console`.
pub async fn launch(
    spec: &LaunchSpec,
    console: &Console,
    options: LaunchOptions,
) -> Result<(), LaunchError> {
    let executable = spec.executable.clone();

    let mut cmd = Command::new(&spec.executable);
    cmd.args(&spec.args)
        .current_dir(&spec.working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!(command = %spec, working_dir = %spec.working_dir.display(), "spawning target");

    let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
        executable: executable.clone(),
        source,
    })?;
    let stdout = child.stdout.take().ok_or_else(|| LaunchError::Capture {
        executable: executable.clone(),
        stream: "stdout",
    })?;
    let stderr = child.stderr.take().ok_or_else(|| LaunchError::Capture {
        executable: executable.clone(),
        stream: "stderr",
    })?;

    let state = Arc::new(RelayState::default());
    let (stop_tx, stop_rx) = watch::channel(false);

    let indicator = options.indicator.then(|| {
        tokio::spawn(relay::run_indicator(
            executable.clone(),
            console.clone(),
            state.clone(),
            stop_rx,
            options.interval,
        ))
    });
    let out_relay = tokio::spawn(relay::relay_lines(
        stdout,
        relay::Stream::Stdout,
        console.clone(),
        state.clone(),
        options.indicator,
    ));
    let err_relay = tokio::spawn(relay::relay_lines(
        stderr,
        relay::Stream::Stderr,
        console.clone(),
        state.clone(),
        options.indicator,
    ));

    let (out_lines, err_lines) = tokio::join!(out_relay, err_relay);
    let out_lines = out_lines.unwrap_or_else(|e| {
        warn!(error = %e, "stdout relay task failed");
        0
    });
    let err_lines = err_lines.unwrap_or_else(|e| {
        warn!(error = %e, "stderr relay task failed");
        0
    });

    stop_tx.send_replace(true);
    if let Some(handle) = indicator
        && let Err(e) = handle.await
    {
        warn!(error = %e, "indicator task failed");
    }

    let status = child.wait().await.map_err(|source| LaunchError::Wait {
        executable: executable.clone(),
        source,
    })?;

    info!(
        executable = %executable,
        exit_code = ?status.code(),
        stdout_lines = out_lines,
        stderr_lines = err_lines,
        "target exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(LaunchError::ChildFailed { executable, status })
    }
}
