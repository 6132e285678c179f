//! Error taxonomy.
//!
//! ConfigError   - alias/options files (recovered locally by callers that can fall back)
//! LaunchError   - spawning, relaying and waiting on the target executable
//! DispatchError - everything the root command can fail with
//!
//! `main` prints the full source chain and turns any of these into exit code 1.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to start {executable} (is {executable} installed?)")]
    Spawn {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to capture {stream} of {executable}")]
    Capture {
        executable: String,
        stream: &'static str,
    },

    #[error("failed waiting for {executable}")]
    Wait {
        executable: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed: {executable} ({status})")]
    ChildFailed {
        executable: String,
        status: ExitStatus,
    },
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no prompt provided")]
    EmptyPrompt,

    #[error("failed to read prompt from stdin")]
    Stdin(#[source] std::io::Error),

    #[error("failed to determine working directory")]
    WorkingDirectory(#[source] ConfigError),

    #[error("failed to create async runtime")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Launch(#[from] LaunchError),
}

pub type Result<T, E = DispatchError> = std::result::Result<T, E>;
