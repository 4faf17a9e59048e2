//! Range expressions: the textual mini-language for picking frames.
//!
//! An expression is a comma-separated list of tokens. Each token is either a
//! single frame (`"5"`) or an inclusive span (`"10-15"`). Whitespace around
//! tokens and around the dash is ignored, as are empty tokens, so `""`,
//! `" "` and `"3,,5,"` are all valid.
//!
//! ```text
//! "3,5,10-15,20"  ->  {3, 5, 10, 11, 12, 13, 14, 15, 20}
//! ```

use std::fmt;

use vace_common::{EditError, EditResult};

const SPAN_FORMAT_HINT: &str = "Use format 'start-end' (e.g., '10-15')";
const INTEGER_HINT: &str = "Frame indices must be integers";

/// One token of a range expression, before bounds checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeToken {
    Single(i64),
    Span { start: i64, end: i64 },
}

impl RangeToken {
    /// Parse a single trimmed, non-empty token. `length` is only used to
    /// describe the valid domain in errors.
    pub fn parse(token: &str, length: usize, field: &str) -> EditResult<Self> {
        if token.contains('-') {
            let parts: Vec<&str> = token.split('-').collect();
            if parts.len() != 2 {
                return Err(EditError::format(field, token, SPAN_FORMAT_HINT, length));
            }
            let start = parse_int(parts[0], token, length, field)?;
            let end = parse_int(parts[1], token, length, field)?;
            if start > end {
                return Err(EditError::RangeOrder {
                    field: field.to_string(),
                    literal: token.to_string(),
                    start,
                    end,
                    length,
                });
            }
            Ok(RangeToken::Span { start, end })
        } else {
            Ok(RangeToken::Single(parse_int(token, token, length, field)?))
        }
    }

    /// Check the token against `[0, length - 1]` and return its inclusive
    /// bounds as indices.
    fn bounded(self, length: usize, literal: &str, field: &str) -> EditResult<(usize, usize)> {
        let (start, end) = match self {
            RangeToken::Single(v) => (v, v),
            RangeToken::Span { start, end } => (start, end),
        };
        let out_of_bounds = |value: i64| EditError::OutOfBounds {
            field: field.to_string(),
            literal: literal.to_string(),
            value,
            length,
        };
        if start < 0 {
            return Err(out_of_bounds(start));
        }
        if end >= length as i64 {
            return Err(out_of_bounds(end));
        }
        Ok((start as usize, end as usize))
    }
}

fn parse_int(text: &str, literal: &str, length: usize, field: &str) -> EditResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| EditError::format(field, literal, INTEGER_HINT, length))
}

/// Resolve an expression to frame indices in the order written, keeping
/// duplicates.
///
/// Tokens are validated one at a time, left to right, so the first bad token
/// is the one reported.
pub fn expand_indices(expression: &str, length: usize, field: &str) -> EditResult<Vec<usize>> {
    let mut indices = Vec::new();
    for token in expression.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }
        let (start, end) = RangeToken::parse(token, length, field)?.bounded(length, token, field)?;
        indices.extend(start..=end);
    }
    Ok(indices)
}

/// A deduplicated, ascending set of frame indices, all valid for the buffer
/// the expression was parsed against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FrameIndexSet {
    indices: Vec<usize>,
}

impl FrameIndexSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `expression` against a buffer of `length` frames. `field` names
    /// the parameter in error reports.
    pub fn parse(expression: &str, length: usize, field: &str) -> EditResult<Self> {
        let mut indices = expand_indices(expression, length, field)?;
        indices.sort_unstable();
        indices.dedup();
        Ok(Self { indices })
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Indices present in both sets, ascending.
    pub fn intersection(&self, other: &FrameIndexSet) -> Vec<usize> {
        let (mut a, mut b) = (self.indices.iter().peekable(), other.indices.iter().peekable());
        let mut shared = Vec::new();
        while let (Some(&&x), Some(&&y)) = (a.peek(), b.peek()) {
            match x.cmp(&y) {
                std::cmp::Ordering::Less => {
                    a.next();
                }
                std::cmp::Ordering::Greater => {
                    b.next();
                }
                std::cmp::Ordering::Equal => {
                    shared.push(x);
                    a.next();
                    b.next();
                }
            }
        }
        shared
    }
}

impl<'a> IntoIterator for &'a FrameIndexSet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.indices.iter().copied()
    }
}

/// Canonical rendering: consecutive runs collapse to `start-end`.
impl fmt::Display for FrameIndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut i = 0;
        while i < self.indices.len() {
            let start = self.indices[i];
            let mut end = start;
            while i + 1 < self.indices.len() && self.indices[i + 1] == end + 1 {
                i += 1;
                end += 1;
            }
            if !first {
                f.write_str(",")?;
            }
            first = false;
            if start == end {
                write!(f, "{start}")?;
            } else {
                write!(f, "{start}-{end}")?;
            }
            i += 1;
        }
        Ok(())
    }
}
