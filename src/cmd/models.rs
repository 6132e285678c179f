/*!
`models.rs`

`llm-cli models [--json]` - list configured aliases grouped by target CLI.

Human output:

  Available models:

  claude:
    haiku (default) -> claude --model claude-haiku-4-5-20251001
    ...

  Config file: ~/.llm-cli/models.json

JSON output:
{
  "status": "ok",
  "default_model": "haiku",
  "config_file": "...",
  "groups": { "claude": [ { "alias": "haiku", "model_id": "...", "default": true } ] }
}
*/

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;

use crate::cmd::format::{Role, StyleOptions, color};
use crate::config::{AliasEntry, AliasTable, ConfigPaths};
use crate::launch::convention::convention_for;

#[derive(Args, Debug, Default)]
pub struct ModelsArgs {
    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

pub fn execute_models(args: ModelsArgs, paths: &ConfigPaths) -> Result<()> {
    let table = AliasTable::load_or_builtin(paths);
    let config_file = paths.models_file().display().to_string();

    if args.json {
        println!("{}", render_json(&table, &config_file));
    } else {
        print!("{}", render_text(&table, &config_file, &StyleOptions::for_stdout()));
    }
    Ok(())
}

/// Aliases per CLI, both levels sorted.
fn group_by_cli(table: &AliasTable) -> BTreeMap<&str, Vec<(&str, &AliasEntry)>> {
    let mut groups: BTreeMap<&str, Vec<(&str, &AliasEntry)>> = BTreeMap::new();
    for (alias, entry) in &table.models {
        groups
            .entry(entry.cli.as_str())
            .or_default()
            .push((alias.as_str(), entry));
    }
    groups
}

fn render_text(table: &AliasTable, config_file: &str, style: &StyleOptions) -> String {
    let default_alias = table.default_alias();
    let mut out = String::new();

    let _ = writeln!(out, "{}", color(Role::Heading, "Available models:", style));

    for (cli, aliases) in group_by_cli(table) {
        let model_flag = convention_for(cli).model_flag;
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", color(Role::Heading, format!("{cli}:"), style));
        for (alias, entry) in aliases {
            let mark = if alias == default_alias {
                color(Role::Accent, " (default)", style)
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "  {alias}{mark} -> {cli} {model_flag} {}",
                entry.model_id
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        color(Role::Dim, format!("Config file: {config_file}"), style)
    );
    out
}

fn render_json(table: &AliasTable, config_file: &str) -> serde_json::Value {
    let default_alias = table.default_alias();
    let groups: serde_json::Map<String, serde_json::Value> = group_by_cli(table)
        .into_iter()
        .map(|(cli, aliases)| {
            let items = aliases
                .into_iter()
                .map(|(alias, entry)| {
                    serde_json::json!({
                        "alias": alias,
                        "model_id": entry.model_id,
                        "default": alias == default_alias,
                    })
                })
                .collect::<Vec<_>>();
            (cli.to_string(), serde_json::Value::Array(items))
        })
        .collect();

    serde_json::json!({
        "status": "ok",
        "default_model": default_alias,
        "config_file": config_file,
        "groups": groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_groups_by_cli_and_marks_default() {
        let text = render_text(&AliasTable::builtin(), "/x/models.json", &StyleOptions::plain());

        let claude_at = text.find("claude:").unwrap();
        let gemini_at = text.find("gemini:").unwrap();
        assert!(claude_at < gemini_at);
        assert!(text.contains("  haiku (default) -> claude --model claude-haiku-4-5-20251001\n"));
        assert!(text.contains("  flash -> gemini -m gemini-2.5-flash\n"));
        assert!(!text.contains("flash (default)"));
        assert!(text.trim_end().ends_with("Config file: /x/models.json"));
    }

    #[test]
    fn passthrough_cli_groups_are_listed() {
        let mut table = AliasTable::builtin();
        table
            .models
            .insert("local".into(), AliasEntry::new("llm", "llama3.2"));
        let text = render_text(&table, "f", &StyleOptions::plain());
        assert!(text.contains("llm:\n  local -> llm -m llama3.2\n"));
    }

    #[test]
    fn json_shape() {
        let v = render_json(&AliasTable::builtin(), "/x/models.json");
        assert_eq!(v["status"], "ok");
        assert_eq!(v["default_model"], "haiku");
        let claude = v["groups"]["claude"].as_array().unwrap();
        assert_eq!(claude.len(), 3);
        let haiku = claude.iter().find(|m| m["alias"] == "haiku").unwrap();
        assert_eq!(haiku["default"], true);
        assert_eq!(v["groups"]["gemini"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn clap_parses_models_json() {
        use clap::Parser;

        #[derive(Parser, Debug)]
        struct TestCli {
            #[command(subcommand)]
            cmd: TestSub,
        }

        #[derive(clap::Subcommand, Debug)]
        enum TestSub {
            Models(ModelsArgs),
        }

        let cli = TestCli::try_parse_from(["t", "models", "--json"]).unwrap();
        let TestSub::Models(args) = cli.cmd;
        assert!(args.json);
    }
}
