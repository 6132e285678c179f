/*!
Command modules.

  prompt.rs   root command (PromptArgs + execute_prompt, dispatch planning)
  models.rs   `models` subcommand (ModelsArgs + execute_models)
  version.rs  `version` subcommand
  format.rs   colour helpers for human output

Each command exposes one public `execute_*` function; `main` owns the
error -> exit code translation.
*/

pub mod format;
pub mod models;
pub mod prompt;
pub mod version;

pub use models::{ModelsArgs, execute_models};
pub use prompt::{PromptArgs, execute_prompt};
pub use version::execute_version;
