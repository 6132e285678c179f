//! Alias table: short names -> (target executable, model identifier).
//!
//! Resolution never fails. A table that cannot be read falls back to the
//! built-in one, an empty alias means "the default", and an unknown alias is
//! passed through to the generic `llm` launcher with the alias as model id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ConfigPaths, read_json, write_json};
use crate::errors::ConfigError;

/// Default alias used when the table does not name a usable one.
pub const FALLBACK_ALIAS: &str = "haiku";

/// Executable receiving aliases that are not in the table.
pub const PASSTHROUGH_CLI: &str = "llm";

/// One alias target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub cli: String,
    pub model_id: String,
}

impl AliasEntry {
    pub fn new(cli: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            cli: cli.into(),
            model_id: model_id.into(),
        }
    }
}

/// Persisted shape of `models.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTable {
    #[serde(default)]
    pub default_model: String,
    #[serde(default)]
    pub models: BTreeMap<String, AliasEntry>,
}

impl AliasTable {
    /// The table written on first run.
    pub fn builtin() -> Self {
        let models = [
            ("haiku", "claude", "claude-haiku-4-5-20251001"),
            ("sonnet", "claude", "claude-sonnet-4-5-20250929"),
            ("opus", "claude", "claude-opus-4-1-20250805"),
            ("gemini", "gemini", "gemini-2.5-pro"),
            ("gemini-pro", "gemini", "gemini-2.5-pro"),
            ("flash", "gemini", "gemini-2.5-flash"),
            ("flash-lite", "gemini", "gemini-2.5-flash-lite"),
        ]
        .into_iter()
        .map(|(alias, cli, model)| (alias.to_string(), AliasEntry::new(cli, model)))
        .collect();

        Self {
            default_model: FALLBACK_ALIAS.to_string(),
            models,
        }
    }

    /// Load `models.json`, writing the built-in table first if it is absent.
    pub fn load(paths: &ConfigPaths) -> Result<Self, ConfigError> {
        let path = paths.models_file();
        match read_json::<AliasTable>(&path)? {
            Some(table) => Ok(table),
            None => {
                let table = Self::builtin();
                table.save(paths)?;
                debug!(path = %path.display(), "wrote default alias table");
                Ok(table)
            }
        }
    }

    /// Like [`AliasTable::load`] but never fails: storage problems fall back
    /// to the built-in table.
    pub fn load_or_builtin(paths: &ConfigPaths) -> Self {
        Self::load(paths).unwrap_or_else(|err| {
            warn!(error = %err, "alias table unavailable; using built-in aliases");
            Self::builtin()
        })
    }

    pub fn save(&self, paths: &ConfigPaths) -> Result<(), ConfigError> {
        write_json(&paths.models_file(), self)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.models.contains_key(alias)
    }

    /// Alias used when none is given on the command line.
    pub fn default_alias(&self) -> &str {
        let configured = self.default_model.trim();
        if configured.is_empty() {
            FALLBACK_ALIAS
        } else {
            configured
        }
    }

    /// Map an alias to its target. See the module docs for the fallbacks.
    pub fn resolve(&self, alias: &str) -> AliasEntry {
        if alias.is_empty() {
            return self.resolve_default();
        }
        if let Some(entry) = self.models.get(alias) {
            return entry.clone();
        }
        warn!(
            alias,
            cli = PASSTHROUGH_CLI,
            "unknown model alias; passing it through as a model id"
        );
        AliasEntry::new(PASSTHROUGH_CLI, alias)
    }

    fn resolve_default(&self) -> AliasEntry {
        if let Some(entry) = self.models.get(self.default_alias()) {
            return entry.clone();
        }
        self.models
            .get(FALLBACK_ALIAS)
            .cloned()
            .or_else(|| Self::builtin().models.remove(FALLBACK_ALIAS))
            .unwrap_or_else(|| AliasEntry::new(PASSTHROUGH_CLI, FALLBACK_ALIAS))
    }
}
