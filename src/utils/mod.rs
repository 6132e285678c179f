//! Utilities: logging setup (verbosity flags -> tracing filter).
//!
//! Key items:
//!   derive_level / init_logging
//!
//! Logs always go to stderr; stdout is reserved for relayed model output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding an `EnvFilter` directive (e.g. "debug",
/// "llm_cli::launch=trace"). Takes precedence over -v / -q.
pub const LOG_ENV: &str = "LLM_CLI_LOG";

/// Map -v / -q to a level. Warnings are on by default so alias pass-through
/// and config fallbacks stay visible.
pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(level: LevelFilter) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::default().add_directive(level.into()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
