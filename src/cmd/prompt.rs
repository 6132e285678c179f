/*!
`prompt.rs`

The root command: send a prompt to the target CLI behind a model alias.

  llm-cli "what is the capital of france?"       default alias
  llm-cli opus "explain rust lifetimes"          first word is a known alias
  llm-cli -m flash -s "be terse" "hello"         flags
  echo "some code" | llm-cli                     piped stdin is the prompt
  echo "some code" | llm-cli review this -       `-` appends piped stdin

Stdin is only read when nothing else was given or a `-` word asks for it, so
`llm-cli "hi"` inside a `while read` loop leaves the loop's input alone.

Flow:
  PromptArgs + piped stdin -> DispatchRequest
  DispatchRequest + AliasTable + ConfigPaths -> LaunchSpec (plan)
  LaunchSpec -> launch::launch (fresh tokio runtime, blocks until exit)
*/

use std::io::{IsTerminal, Read};

use clap::Args;
use tracing::info;

use crate::config::{AliasTable, ConfigPaths, working_directory};
use crate::errors::{DispatchError, Result};
use crate::launch::{self, Console, LaunchOptions, LaunchSpec};

/// Positional word that asks for piped stdin to be appended to the prompt.
pub const STDIN_MARKER: &str = "-";

/// Root command flags and positionals.
#[derive(Args, Debug, Default, Clone)]
pub struct PromptArgs {
    /// Model alias to use (e.g. haiku, opus, sonnet, gemini, flash)
    #[arg(short = 'm', long = "model", value_name = "ALIAS")]
    pub model: Option<String>,

    /// Prompt text
    #[arg(short = 'p', long = "prompt", value_name = "TEXT")]
    pub prompt: Option<String>,

    /// System prompt passed to the target CLI
    #[arg(short = 's', long = "system", value_name = "TEXT")]
    pub system: Option<String>,

    /// Run in the sessions directory even if options.json says otherwise
    #[arg(short = 't', long = "run-on-temp-directory")]
    pub run_on_temp_dir: bool,

    /// [MODEL-ALIAS] PROMPT...
    #[arg(value_name = "WORDS")]
    pub words: Vec<String>,
}

impl PromptArgs {
    /// No positional words and no `--prompt`.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.prompt.is_none()
    }

    /// Whether piped stdin is a prompt source for this invocation.
    pub fn wants_stdin(&self) -> bool {
        self.is_empty() || self.words.iter().any(|w| w == STDIN_MARKER)
    }

    /// Nothing to send: the caller shows help instead.
    pub fn nothing_to_send(&self, stdin: Option<&str>) -> bool {
        self.is_empty() && stdin.is_none_or(|s| s.trim().is_empty())
    }
}

/// Fully parsed request handed to the planner.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub model: Option<String>,
    pub prompt_flag: Option<String>,
    pub system: Option<String>,
    pub force_scratch: bool,
    pub words: Vec<String>,
    pub stdin: Option<String>,
}

impl DispatchRequest {
    pub fn from_args(args: PromptArgs, stdin: Option<String>) -> Self {
        Self {
            model: args.model,
            prompt_flag: args.prompt,
            system: args.system,
            force_scratch: args.run_on_temp_dir,
            words: args.words,
            stdin,
        }
    }

    /// Split positionals into (alias, prompt words). An empty alias means
    /// "the table default".
    pub fn split_alias<'a>(&'a self, table: &AliasTable) -> (&'a str, &'a [String]) {
        if let Some(model) = self.model.as_deref() {
            return (model, self.words.as_slice());
        }
        match self.words.as_slice() {
            [first, rest @ ..] if !rest.is_empty() && table.contains(first) => {
                (first.as_str(), rest)
            }
            words => ("", words),
        }
    }

    /// Combine --prompt, positional text and stdin (blank parts dropped).
    pub fn prompt_text(&self, words: &[String]) -> Result<String> {
        let positional = words
            .iter()
            .map(String::as_str)
            .filter(|w| *w != STDIN_MARKER)
            .collect::<Vec<_>>()
            .join(" ");
        let parts: Vec<&str> = [
            self.prompt_flag.as_deref(),
            Some(positional.as_str()),
            self.stdin.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim_end)
        .filter(|s| !s.trim().is_empty())
        .collect();

        if parts.is_empty() {
            return Err(DispatchError::EmptyPrompt);
        }
        Ok(parts.join("\n\n"))
    }
}

/// Decide what to run and where.
pub fn plan(request: &DispatchRequest, table: &AliasTable, paths: &ConfigPaths) -> Result<LaunchSpec> {
    let (alias, words) = request.split_alias(table);
    let prompt = request.prompt_text(words)?;
    let entry = table.resolve(alias);
    let args = launch::build_args(&entry.cli, &entry.model_id, request.system.as_deref(), &prompt);
    let working_dir =
        working_directory(paths, request.force_scratch).map_err(DispatchError::WorkingDirectory)?;

    let shown_alias = if alias.is_empty() {
        table.default_alias()
    } else {
        alias
    };
    info!(
        alias = shown_alias,
        executable = %entry.cli,
        model = %entry.model_id,
        working_dir = %working_dir.display(),
        "dispatching prompt"
    );

    Ok(LaunchSpec {
        executable: entry.cli,
        args,
        working_dir,
    })
}

/// Entry point for the root command. `stdin` comes from [`read_stdin_for`].
pub fn execute_prompt(args: PromptArgs, stdin: Option<String>, paths: &ConfigPaths) -> Result<()> {
    let request = DispatchRequest::from_args(args, stdin);
    let table = AliasTable::load_or_builtin(paths);
    let spec = plan(&request, &table, paths)?;

    let rt = tokio::runtime::Runtime::new().map_err(DispatchError::Runtime)?;
    rt.block_on(launch::launch(&spec, &Console::stdio(), LaunchOptions::detect()))?;
    Ok(())
}

/// Whether stdin is a pipe or file rather than an interactive terminal.
pub fn stdin_is_piped() -> bool {
    !std::io::stdin().is_terminal()
}

/// Read piped stdin to EOF, but only when `args` asks for it.
pub fn read_stdin_for(args: &PromptArgs) -> Result<Option<String>> {
    if !args.wants_stdin() || !stdin_is_piped() {
        return Ok(None);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(DispatchError::Stdin)?;
    Ok(Some(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn haiku_table() -> AliasTable {
        serde_json::from_str(
            r#"{"default_model":"haiku","models":{"haiku":{"cli":"claude","model_id":"claude-haiku-4-5-20251001"}}}"#,
        )
        .unwrap()
    }

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    fn request(ws: &[&str]) -> DispatchRequest {
        DispatchRequest {
            words: words(ws),
            ..Default::default()
        }
    }

    #[test]
    fn default_alias_scenario() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());

        let spec = plan(&request(&["hi"]), &haiku_table(), &paths).unwrap();

        assert_eq!(spec.executable, "claude");
        assert_eq!(spec.args, ["--model", "claude-haiku-4-5-20251001", "-p", "hi"]);
        assert!(!spec.args.iter().any(|a| a == "--system-prompt"));
        assert_eq!(spec.working_dir, paths.sessions_dir());
    }

    #[test]
    fn single_word_is_prompt_even_if_alias() {
        let table = AliasTable::builtin();
        let req = request(&["opus"]);
        let (alias, rest) = req.split_alias(&table);
        assert_eq!(alias, "");
        assert_eq!(rest, words(&["opus"]).as_slice());
    }

    #[test]
    fn leading_known_alias_is_taken() {
        let table = AliasTable::builtin();
        let req = request(&["flash", "translate", "hello"]);
        let (alias, rest) = req.split_alias(&table);
        assert_eq!(alias, "flash");
        assert_eq!(req.prompt_text(rest).unwrap(), "translate hello");
    }

    #[test]
    fn unknown_leading_word_stays_in_prompt() {
        let table = AliasTable::builtin();
        let req = request(&["what", "is", "2+2?"]);
        let (alias, rest) = req.split_alias(&table);
        assert_eq!(alias, "");
        assert_eq!(req.prompt_text(rest).unwrap(), "what is 2+2?");
    }

    #[test]
    fn model_flag_keeps_all_words() {
        let table = AliasTable::builtin();
        let req = DispatchRequest {
            model: Some("opus".into()),
            words: words(&["sonnet", "vs", "opus?"]),
            ..Default::default()
        };
        let (alias, rest) = req.split_alias(&table);
        assert_eq!(alias, "opus");
        assert_eq!(rest.len(), 3);
    }

    #[test]
    fn prompt_sources_are_joined() {
        let req = DispatchRequest {
            prompt_flag: Some("summarize".into()),
            stdin: Some("fn main() {}\n".into()),
            ..Default::default()
        };
        assert_eq!(req.prompt_text(&words(&["briefly"])).unwrap(), "summarize\n\nbriefly\n\nfn main() {}");
    }

    #[test]
    fn stdin_is_left_alone_when_prompt_is_given() {
        let args = PromptArgs {
            words: words(&["hi"]),
            ..Default::default()
        };
        assert!(!args.wants_stdin());
        assert_eq!(read_stdin_for(&args).unwrap(), None);

        let flag_only = PromptArgs {
            prompt: Some("hi".into()),
            ..Default::default()
        };
        assert!(!flag_only.wants_stdin());
        assert_eq!(read_stdin_for(&flag_only).unwrap(), None);
    }

    #[test]
    fn stdin_is_wanted_when_empty_or_marked() {
        assert!(PromptArgs::default().wants_stdin());

        let marked = PromptArgs {
            words: words(&["review", "this", "-"]),
            ..Default::default()
        };
        assert!(marked.wants_stdin());
    }

    #[test]
    fn stdin_marker_is_not_prompt_text() {
        let table = AliasTable::builtin();
        let req = DispatchRequest {
            stdin: Some("fn main() {}\n".into()),
            ..request(&["opus", "review", "-"])
        };
        let (alias, rest) = req.split_alias(&table);
        assert_eq!(alias, "opus");
        assert_eq!(req.prompt_text(rest).unwrap(), "review\n\nfn main() {}");

        let only_marker = DispatchRequest {
            stdin: Some("hello".into()),
            ..request(&["-"])
        };
        let (alias, rest) = only_marker.split_alias(&table);
        assert_eq!(alias, "");
        assert_eq!(only_marker.prompt_text(rest).unwrap(), "hello");
    }

    #[test]
    fn empty_input_shows_help() {
        let none = PromptArgs::default();
        assert!(none.nothing_to_send(None));
        assert!(none.nothing_to_send(Some("")));
        assert!(none.nothing_to_send(Some(" \n")));
        assert!(!none.nothing_to_send(Some("summarize this")));

        let with_words = PromptArgs {
            words: words(&["hi"]),
            ..Default::default()
        };
        assert!(!with_words.nothing_to_send(None));
    }

    #[test]
    fn empty_prompt_is_an_error() {
        let req = DispatchRequest {
            stdin: Some("   \n".into()),
            ..Default::default()
        };
        assert!(matches!(req.prompt_text(&[]), Err(DispatchError::EmptyPrompt)));
    }

    #[test]
    fn system_prompt_and_passthrough_alias() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());
        let req = DispatchRequest {
            model: Some("llama3.2".into()),
            system: Some("be terse".into()),
            words: words(&["hello"]),
            ..Default::default()
        };

        let spec = plan(&req, &AliasTable::builtin(), &paths).unwrap();

        assert_eq!(spec.executable, "llm");
        assert_eq!(spec.args, ["prompt", "-m", "llama3.2", "--system", "be terse", "hello"]);
    }

    #[test]
    fn current_directory_option_is_honoured_unless_forced() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = ConfigPaths::new(tmp.path());
        Options {
            run_on_current_directory: true,
        }
        .save(&paths)
        .unwrap();

        let spec = plan(&request(&["hi"]), &haiku_table(), &paths).unwrap();
        assert_eq!(spec.working_dir, std::env::current_dir().unwrap());

        let forced = DispatchRequest {
            force_scratch: true,
            ..request(&["hi"])
        };
        let spec = plan(&forced, &haiku_table(), &paths).unwrap();
        assert_eq!(spec.working_dir, paths.sessions_dir());
    }
}
