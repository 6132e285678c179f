//! Run options (`options.json`) and working-directory selection.
//!
//! The target CLIs keep their own session state relative to the directory
//! they are launched in, so by default they run inside `<root>/sessions`
//! rather than wherever the user happens to be.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ConfigPaths, read_json, write_json};
use crate::errors::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Run the target CLI in the caller's current directory instead of the
    /// sessions directory.
    #[serde(default)]
    pub run_on_current_directory: bool,
}

impl Options {
    /// Load `options.json`, writing the defaults first if it is absent.
    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        match read_json::<Options>(&paths.options_file())? {
            Some(options) => Ok(options),
            None => {
                let options = Self::default();
                options.save(paths)?;
                Ok(options)
            }
        }
    }

    pub fn save(&self, paths: &ConfigPaths) -> Result<(), ConfigError> {
        write_json(&paths.options_file(), self)
    }
}

/// Directory the target CLI should run in.
///
/// `force_scratch` always selects the sessions directory. Otherwise the
/// persisted `run_on_current_directory` option decides; unreadable options
/// count as `false`.
pub fn working_directory(paths: &ConfigPaths, force_scratch: bool) -> Result<PathBuf, ConfigError> {
    if force_scratch {
        return paths.ensure_sessions_dir();
    }

    let options = Options::load(paths).unwrap_or_else(|err| {
        warn!(error = %err, "options unavailable; using sessions directory");
        Options::default()
    });

    if options.run_on_current_directory {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::io(".", e))?;
        debug!(dir = %cwd.display(), "running in current directory");
        return Ok(cwd);
    }

    paths.ensure_sessions_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sessions_dir_and_writes_options() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());

        let dir = working_directory(&paths, false).unwrap();
        assert_eq!(dir, paths.sessions_dir());
        assert!(dir.is_dir());
        assert_eq!(Options::load(&paths).unwrap(), Options::default());
        assert!(paths.options_file().exists());
    }

    #[test]
    fn current_directory_when_enabled() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());
        Options {
            run_on_current_directory: true,
        }
        .save(&paths)
        .unwrap();

        let dir = working_directory(&paths, false).unwrap();
        assert_eq!(dir, std::env::current_dir().unwrap());
        assert!(!paths.sessions_dir().exists());
    }

    #[test]
    fn force_scratch_overrides_option() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());
        Options {
            run_on_current_directory: true,
        }
        .save(&paths)
        .unwrap();

        assert_eq!(working_directory(&paths, true).unwrap(), paths.sessions_dir());
    }

    #[test]
    fn unreadable_options_fall_back_to_sessions_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());
        std::fs::write(paths.options_file(), "run_on_current_directory=true").unwrap();

        assert_eq!(working_directory(&paths, false).unwrap(), paths.sessions_dir());
    }
}
