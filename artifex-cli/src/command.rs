//! Interactive command parsing.

use thiserror::Error;

/// A command entered at the table prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Next page.
    Next,
    /// Previous page.
    Prev,
    /// Jump to a 1-based page number.
    Goto(usize),
    /// Re-request the current page.
    Reload,
    /// Flip the check boxes of these row ids on the current page.
    Toggle(Vec<String>),
    /// Bulk-select with the raw input; the engine validates it.
    Select(String),
    /// Clear the whole selection.
    Clear,
    /// List every selected id across all pages.
    List,
    /// Redraw the table.
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'h' for help")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a page number")]
    InvalidPage(String),
}

pub const HELP: &str = "\
commands:
  n, next           next page
  p, prev           previous page
  g, goto <page>    jump to page
  t, toggle <id>..  check or uncheck rows on this page
  s, select <N>     select the first N rows from the top of this page
  l, list           list the selected ids
  c, clear          clear the selection
  r, reload         reload the current page
  v, view           redraw the table
  h, help           this help
  q, quit           exit";

impl Command {
    /// Parses one line of input. An empty line redraws the table.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Ok(Self::Show);
        };
        let rest: Vec<&str> = parts.collect();

        match head.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" => Ok(Self::Prev),
            "g" | "goto" => {
                let arg = rest.first().ok_or(CommandError::MissingArgument("goto"))?;
                arg.parse::<usize>()
                    .ok()
                    .filter(|page| *page > 0)
                    .map(Self::Goto)
                    .ok_or_else(|| CommandError::InvalidPage(arg.to_string()))
            }
            "t" | "toggle" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("toggle"));
                }
                Ok(Self::Toggle(rest.iter().map(|s| s.to_string()).collect()))
            }
            "s" | "select" => Ok(Self::Select(rest.join(" "))),
            "l" | "list" => Ok(Self::List),
            "c" | "clear" => Ok(Self::Clear),
            "r" | "reload" => Ok(Self::Reload),
            "v" | "view" => Ok(Self::Show),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
