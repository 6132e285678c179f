//! Per-executable calling conventions.
//!
//!   claude : claude --model ID [--system-prompt SYS] -p PROMPT
//!   gemini : gemini -m ID [--system SYS] PROMPT
//!   other  : <cli> prompt -m ID [--system SYS] PROMPT   (the `llm` tool)

/// Flag spelling for one target executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Convention {
    /// Arguments placed before everything else (e.g. a subcommand).
    pub leading: &'static [&'static str],
    pub model_flag: &'static str,
    pub system_flag: &'static str,
    /// Flag introducing the prompt, if the prompt is not a bare positional.
    pub prompt_flag: Option<&'static str>,
}

const CLAUDE: Convention = Convention {
    leading: &[],
    model_flag: "--model",
    system_flag: "--system-prompt",
    prompt_flag: Some("-p"),
};

const GEMINI: Convention = Convention {
    leading: &[],
    model_flag: "-m",
    system_flag: "--system",
    prompt_flag: None,
};

const GENERIC: Convention = Convention {
    leading: &["prompt"],
    model_flag: "-m",
    system_flag: "--system",
    prompt_flag: None,
};

static CONVENTIONS: &[(&str, Convention)] = &[("claude", CLAUDE), ("gemini", GEMINI)];

/// Convention for `cli`; unknown names get the generic one.
pub fn convention_for(cli: &str) -> &'static Convention {
    CONVENTIONS
        .iter()
        .find(|(name, _)| *name == cli)
        .map(|(_, conv)| conv)
        .unwrap_or(&GENERIC)
}

impl Convention {
    /// Argument list for one request. The system prompt, when present, always
    /// sits before the trailing prompt.
    pub fn build_args(&self, model_id: &str, system: Option<&str>, prompt: &str) -> Vec<String> {
        let mut args: Vec<String> = self.leading.iter().map(|s| s.to_string()).collect();
        args.push(self.model_flag.to_string());
        args.push(model_id.to_string());
        if let Some(sys) = system.filter(|s| !s.is_empty()) {
            args.push(self.system_flag.to_string());
            args.push(sys.to_string());
        }
        if let Some(flag) = self.prompt_flag {
            args.push(flag.to_string());
        }
        args.push(prompt.to_string());
        args
    }
}

/// Shorthand for `convention_for(cli).build_args(..)`.
pub fn build_args(cli: &str, model_id: &str, system: Option<&str>, prompt: &str) -> Vec<String> {
    convention_for(cli).build_args(model_id, system, prompt)
}
