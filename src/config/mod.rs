//! Persistent configuration under the application root (`~/.llm-cli`).
//!
//! ConfigPaths -> locations of models.json / options.json / sessions/
//! models      -> alias table (load / save / resolve)
//! options     -> run options + working directory selection
//!
//! Both JSON files are created with defaults on first use and always
//! rewritten whole (pretty printed); there are no partial updates.

pub mod models;
pub mod options;

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::ConfigError;

pub use models::{AliasEntry, AliasTable};
pub use options::{Options, working_directory};

/// Environment override for the config root.
pub const HOME_ENV: &str = "LLM_CLI_HOME";

const ROOT_DIR_NAME: &str = ".llm-cli";
const MODELS_FILE: &str = "models.json";
const OPTIONS_FILE: &str = "options.json";
const SESSIONS_DIR: &str = "sessions";

/// Resolved locations of everything llm-cli persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$LLM_CLI_HOME` if set, else `~/.llm-cli`, else `.llm-cli` relative to
    /// the current directory when no home directory can be determined.
    pub fn detect() -> Self {
        if let Ok(home) = std::env::var(HOME_ENV)
            && !home.trim().is_empty()
        {
            return Self::new(home);
        }
        match dirs::home_dir() {
            Some(home) => Self::new(home.join(ROOT_DIR_NAME)),
            None => Self::new(ROOT_DIR_NAME),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn models_file(&self) -> PathBuf {
        self.root.join(MODELS_FILE)
    }

    pub fn options_file(&self) -> PathBuf {
        self.root.join(OPTIONS_FILE)
    }

    pub fn sessions_dir(&self) -> PathBuf {
        self.root.join(SESSIONS_DIR)
    }

    /// Create the sessions directory if needed and return it.
    pub fn ensure_sessions_dir(&self) -> Result<PathBuf, ConfigError> {
        let dir = self.sessions_dir();
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::io(&dir, e))?;
        Ok(dir)
    }
}

/// Read a JSON file. `Ok(None)` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ConfigError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ConfigError::io(path, e)),
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Rewrite a JSON file (two-space indentation), creating parent directories.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
    }
    let data = serde_json::to_string_pretty(value).map_err(|source| ConfigError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|e| ConfigError::io(path, e))
}
