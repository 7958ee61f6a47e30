//! Selection expressions
//!
//! Turns user input such as `2-5,8` into concrete catalog indices.
//!
//! Syntax:
//! - `N` selects index N
//! - `N-M` selects the inclusive range N..=M
//! - `A,B,C` composes any of the above, evaluated left to right
//!
//! A bad token never aborts the whole expression: it is reported and
//! skipped, and the remaining tokens are still expanded.

use thiserror::Error;

/// Malformed numeric token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid start of range")]
    InvalidStart,
    #[error("invalid end of range")]
    InvalidEnd,
}

/// Well-formed range that does not fit the catalog
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("start {0} is negative")]
    Negative(i64),
    #[error("end {end} is past the last result ({size} results)")]
    OutOfBounds { end: i64, size: usize },
    #[error("start {start} is after end {end}")]
    Reversed { start: i64, end: i64 },
}

/// Why a single token was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("'{token}': {source}")]
    Parse {
        token: String,
        #[source]
        source: ParseError,
    },
    #[error("'{token}': range not valid, {source}")]
    Range {
        token: String,
        #[source]
        source: RangeError,
    },
}

/// Result of expanding a full selection expression
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Valid indices in order of appearance, duplicates preserved
    pub indices: Vec<usize>,
    /// One entry per skipped token
    pub diagnostics: Vec<SelectionError>,
}

/// Parse a single `N` or `N-M` token into inclusive bounds
///
/// Bounds are not checked against each other or any catalog here.
pub fn parse_range(expr: &str) -> Result<(i64, i64), ParseError> {
    let expr = expr.trim();
    let (left, right) = match expr.split_once('-') {
        Some((left, right)) => (left, Some(right)),
        None => (expr, None),
    };

    let start = parse_bound(left).ok_or(ParseError::InvalidStart)?;
    let end = match right {
        Some(right) => parse_bound(right).ok_or(ParseError::InvalidEnd)?,
        None => start,
    };

    Ok((start, end))
}

/// Base-10 integer with an optional leading `+`
fn parse_bound(s: &str) -> Option<i64> {
    let s = s.trim();
    let digits = s.strip_prefix('+').unwrap_or(s);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Check parsed bounds against the catalog size
fn validate(start: i64, end: i64, catalog_size: usize) -> Result<(usize, usize), RangeError> {
    if start < 0 {
        return Err(RangeError::Negative(start));
    }
    if end < 0 || end as u64 >= catalog_size as u64 {
        return Err(RangeError::OutOfBounds {
            end,
            size: catalog_size,
        });
    }
    if start > end {
        return Err(RangeError::Reversed { start, end });
    }
    Ok((start as usize, end as usize))
}

/// Expand a comma-separated selection against a catalog of `catalog_size`
pub fn expand(expr_list: &str, catalog_size: usize) -> Expansion {
    let mut expansion = Expansion::default();

    for token in expr_list.split(',') {
        let (start, end) = match parse_range(token) {
            Ok(bounds) => bounds,
            Err(source) => {
                let err = SelectionError::Parse {
                    token: token.to_string(),
                    source,
                };
                tracing::warn!("{}", err);
                expansion.diagnostics.push(err);
                continue;
            }
        };

        match validate(start, end, catalog_size) {
            Ok((start, end)) => expansion.indices.extend(start..=end),
            Err(source) => {
                let err = SelectionError::Range {
                    token: token.to_string(),
                    source,
                };
                tracing::warn!("{}", err);
                expansion.diagnostics.push(err);
            }
        }
    }

    tracing::debug!(
        indices = ?expansion.indices,
        skipped = expansion.diagnostics.len(),
        "expanded selection"
    );
    expansion
}
