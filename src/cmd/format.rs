/*!
format.rs

Terminal styling for human-readable output (`models` listing, error line).

  - StyleOptions::for_stdout() / for_stderr() -> colour only on a TTY and
    only when NO_COLOR is unset
  - color(role, text, &StyleOptions) -> String

JSON output paths never use these helpers.
*/

use std::io::IsTerminal;

#[derive(Debug, Clone, Copy)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl StyleOptions {
    fn detect(is_tty: bool) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self {
            use_color: is_tty && !no_color,
        }
    }

    pub fn for_stdout() -> Self {
        Self::detect(std::io::stdout().is_terminal())
    }

    pub fn for_stderr() -> Self {
        Self::detect(std::io::stderr().is_terminal())
    }

    pub fn plain() -> Self {
        Self { use_color: false }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Heading,
    Accent,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Heading => "1",
        Role::Accent => "38;5;45",
        Role::Error => "38;5;196",
        Role::Dim => "2",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}
