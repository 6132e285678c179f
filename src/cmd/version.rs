//! `llm-cli version`.
//!
//! Release builds may set `LLM_CLI_COMMIT` and `LLM_CLI_BUILD_DATE` at
//! compile time; without them only the package version is printed.

pub fn version_line(version: &str, commit: Option<&str>, date: Option<&str>) -> String {
    match (commit, date) {
        (Some(commit), Some(date)) => {
            format!("llm-cli version {version} (commit: {commit}, built: {date})")
        }
        _ => format!("llm-cli version {version}"),
    }
}

pub fn execute_version() {
    println!(
        "{}",
        version_line(
            env!("CARGO_PKG_VERSION"),
            option_env!("LLM_CLI_COMMIT"),
            option_env!("LLM_CLI_BUILD_DATE"),
        )
    );
}
