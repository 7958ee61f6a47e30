//! Interactive command parsing
//!
//! Each input line becomes one [`ReplCommand`] carrying its own validated
//! payload. Anything that is not a known command letter is taken as a
//! selection expression and validated later against the catalog.

use thiserror::Error;

/// A line typed at the interactive prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `h`
    Help,
    /// `q`
    Quit,
    /// `i<n>`: show details of catalog entry n
    Info(usize),
    /// `d<n>`: download a format of catalog entry n
    Download(usize),
    /// `/<query>`: replace the catalog with new search results
    Search(String),
    /// `2-5,8`: queue and play a selection
    PlaySelection(String),
    /// Blank line
    Empty,
}

impl ReplCommand {
    /// Whether the command indexes into the current catalog
    pub fn needs_catalog(&self) -> bool {
        matches!(
            self,
            ReplCommand::Info(_) | ReplCommand::Download(_) | ReplCommand::PlaySelection(_)
        )
    }
}

/// Malformed interactive command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("'{command}' needs a result number, e.g. {command}3")]
    MissingIndex { command: char },
    #[error("'{input}' is not a result number")]
    InvalidIndex { input: String },
    #[error("search needs some text after '/'")]
    EmptyQuery,
}

/// Parse one line of interactive input
pub fn parse(line: &str) -> Result<ReplCommand, CommandError> {
    let line = line.trim();
    let mut chars = line.chars();
    let Some(first) = chars.next() else {
        return Ok(ReplCommand::Empty);
    };
    let rest = chars.as_str();

    match first {
        'q' if rest.is_empty() => Ok(ReplCommand::Quit),
        'h' if rest.is_empty() => Ok(ReplCommand::Help),
        'i' => parse_index('i', rest).map(ReplCommand::Info),
        'd' => parse_index('d', rest).map(ReplCommand::Download),
        '/' => {
            let query = rest.trim();
            if query.is_empty() {
                Err(CommandError::EmptyQuery)
            } else {
                Ok(ReplCommand::Search(query.to_string()))
            }
        }
        _ => Ok(ReplCommand::PlaySelection(line.to_string())),
    }
}

fn parse_index(command: char, rest: &str) -> Result<usize, CommandError> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(CommandError::MissingIndex { command });
    }
    rest.parse().map_err(|_| CommandError::InvalidIndex {
        input: rest.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_letter_commands() {
        assert_eq!(parse("q"), Ok(ReplCommand::Quit));
        assert_eq!(parse("h"), Ok(ReplCommand::Help));
        assert_eq!(parse("  "), Ok(ReplCommand::Empty));
    }

    #[test]
    fn test_indexed_commands() {
        assert_eq!(parse("i3"), Ok(ReplCommand::Info(3)));
        assert_eq!(parse("d 12"), Ok(ReplCommand::Download(12)));
        assert_eq!(
            parse("i"),
            Err(CommandError::MissingIndex { command: 'i' })
        );
        assert_eq!(
            parse("dx"),
            Err(CommandError::InvalidIndex { input: "x".into() })
        );
    }

    #[test]
    fn test_search() {
        assert_eq!(
            parse("/daft punk"),
            Ok(ReplCommand::Search("daft punk".into()))
        );
        assert_eq!(parse("/  "), Err(CommandError::EmptyQuery));
    }

    #[test]
    fn test_anything_else_is_a_selection() {
        assert_eq!(
            parse("2-5,8"),
            Ok(ReplCommand::PlaySelection("2-5,8".into()))
        );
        assert!(parse("0").unwrap().needs_catalog());
        assert!(!parse("/x").unwrap().needs_catalog());
    }
}
