use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::debug;

mod cmd;
mod config;
mod errors;
mod launch;
mod utils;

use cmd::format::{Role, StyleOptions, color};
use cmd::{ModelsArgs, PromptArgs};
use config::ConfigPaths;

/// llm-cli - a thin wrapper around the claude and gemini CLIs (and `llm`).
///
/// Usage:
///   llm-cli [MODEL-ALIAS] PROMPT...        send a prompt (alias optional)
///   llm-cli -m opus -s "You are a Rust expert" "explain Pin"
///   echo "..." | llm-cli                  piped stdin is the prompt
///   echo "..." | llm-cli summarize -      `-` appends piped stdin to the prompt
///   llm-cli models [--json]               list aliases
///   llm-cli version
///
/// Configuration (under ~/.llm-cli, or $LLM_CLI_HOME):
///   models.json    {"default_model": "haiku", "models": {"haiku": {"cli": "claude", "model_id": "..."}}}
///   options.json   {"run_on_current_directory": false}
///   sessions/      working directory of the target CLI unless run_on_current_directory
///                  is true; -t forces it for one run
///
/// Unknown aliases are passed to `llm` as the model id (with a warning).
/// Exit code: 0 on success, 1 on any failure.
#[derive(Parser, Debug)]
#[command(
    name = "llm-cli",
    version,
    about = "Send prompts to locally installed LLM CLIs through model aliases",
    verbatim_doc_comment,
    propagate_version = true,
    disable_help_subcommand = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    prompt: PromptArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available model aliases
    Models(ModelsArgs),

    /// Print version information
    Version,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version land here too and are not failures.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    utils::init_logging(utils::derive_level(cli.verbose, cli.quiet));

    let res = run(cli);
    if let Err(err) = &res {
        eprintln!(
            "{} {err:#}",
            color(Role::Error, "error:", &StyleOptions::for_stderr())
        );
    }
    ExitCode::from(exit_code(&res))
}

/// 0 on success, 1 on any failure (including a failing target CLI).
fn exit_code(res: &Result<()>) -> u8 {
    match res {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = ConfigPaths::detect();
    debug!(root = %paths.root().display(), "config root");

    match cli.command {
        Some(Commands::Models(args)) => cmd::execute_models(args, &paths),
        Some(Commands::Version) => {
            cmd::execute_version();
            Ok(())
        }
        None => {
            let stdin = cmd::prompt::read_stdin_for(&cli.prompt)?;
            if cli.prompt.nothing_to_send(stdin.as_deref()) {
                Cli::command().print_help()?;
                return Ok(());
            }
            cmd::execute_prompt(cli.prompt, stdin, &paths)?;
            Ok(())
        }
    }
}
