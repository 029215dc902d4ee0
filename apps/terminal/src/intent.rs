//! User intents raised by the terminal view, parsed from input lines.

use shared::domain::TodoFilter;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewIntent {
    /// Replaces the text in the input field.
    Input(String),
    /// Enter pressed on the input field.
    Submit,
    /// Checkbox on a rendered row (1-based) set to `checked`.
    Check { row: usize, checked: bool },
    /// Checkbox on a rendered row clicked.
    Toggle { row: usize },
    Remove { row: usize },
    Show(TodoFilter),
    ClearCompleted,
    Help,
    Quit,
}

impl ViewIntent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::Submit => "submit",
            Self::Check { .. } => "check",
            Self::Toggle { .. } => "toggle",
            Self::Remove { .. } => "remove",
            Self::Show(_) => "show",
            Self::ClearCompleted => "clear_completed",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("unknown command ':{0}', type :help for the list")]
    UnknownCommand(String),
    #[error(":{0} needs a row number")]
    MissingRow(String),
    #[error("'{0}' is not a row number")]
    InvalidRow(String),
}

pub const HELP: &str = "\
type text and press Enter to add a todo
:done N / :undo N   mark row N completed / active
:toggle N           flip row N
:rm N               remove row N
:all :active :completed   choose filter
:clear              remove completed todos
:quit               exit";

/// Plain text becomes input followed by Enter; `:`-prefixed lines are commands.
/// Blank lines produce no intents.
pub fn parse_line(line: &str) -> Result<Vec<ViewIntent>, IntentError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Vec::new());
    }

    let Some(command) = line.strip_prefix(':') else {
        return Ok(vec![ViewIntent::Input(line.to_string()), ViewIntent::Submit]);
    };

    let mut parts = command.split_whitespace();
    let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
    let arg = parts.next();

    let intent = match verb.as_str() {
        "done" => ViewIntent::Check {
            row: parse_row(&verb, arg)?,
            checked: true,
        },
        "undo" => ViewIntent::Check {
            row: parse_row(&verb, arg)?,
            checked: false,
        },
        "toggle" | "t" => ViewIntent::Toggle {
            row: parse_row(&verb, arg)?,
        },
        "rm" | "remove" => ViewIntent::Remove {
            row: parse_row(&verb, arg)?,
        },
        "all" => ViewIntent::Show(TodoFilter::All),
        "active" => ViewIntent::Show(TodoFilter::Active),
        "completed" => ViewIntent::Show(TodoFilter::Completed),
        "clear" => ViewIntent::ClearCompleted,
        "help" | "h" | "?" => ViewIntent::Help,
        "quit" | "q" | "exit" => ViewIntent::Quit,
        _ => return Err(IntentError::UnknownCommand(verb)),
    };
    Ok(vec![intent])
}

fn parse_row(verb: &str, arg: Option<&str>) -> Result<usize, IntentError> {
    let raw = arg.ok_or_else(|| IntentError::MissingRow(verb.to_string()))?;
    match raw.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(IntentError::InvalidRow(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_typed_then_submitted() {
        assert_eq!(
            parse_line("  buy milk  ").expect("parse"),
            vec![ViewIntent::Input("buy milk".into()), ViewIntent::Submit]
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert!(parse_line("   ").expect("parse").is_empty());
    }

    #[test]
    fn row_commands_take_one_based_rows() {
        assert_eq!(
            parse_line(":done 2").expect("parse"),
            vec![ViewIntent::Check {
                row: 2,
                checked: true
            }]
        );
        assert_eq!(
            parse_line(":RM 1").expect("parse"),
            vec![ViewIntent::Remove { row: 1 }]
        );
        assert_eq!(
            parse_line(":done 0"),
            Err(IntentError::InvalidRow("0".into()))
        );
        assert_eq!(
            parse_line(":toggle"),
            Err(IntentError::MissingRow("toggle".into()))
        );
    }

    #[test]
    fn filter_and_housekeeping_commands() {
        assert_eq!(
            parse_line(":active").expect("parse"),
            vec![ViewIntent::Show(TodoFilter::Active)]
        );
        assert_eq!(
            parse_line(":clear").expect("parse"),
            vec![ViewIntent::ClearCompleted]
        );
        assert_eq!(parse_line(":q").expect("parse"), vec![ViewIntent::Quit]);
        assert_eq!(
            parse_line(":frobnicate"),
            Err(IntentError::UnknownCommand("frobnicate".into()))
        );
    }
}
