use crate::{ParameterTable, truncate_long};
use regex::Regex;
use std::{
    fmt::{self, Display},
    ops::Range,
    sync::LazyLock,
};

/// Quoted literals come first so that a `@name` inside quotes is swallowed by the literal.
/// A literal missing its closing quote runs to the end of the input.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'[^']*'?|@([A-Za-z0-9_]+)").expect("valid token pattern"));

/// A named placeholder occurrence, `start..end` covers the sentinel and the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'s> {
    pub name: &'s str,
    pub start: usize,
    pub end: usize,
}

/// A match produced while scanning the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'s> {
    /// Single quoted literal, skipped.
    Literal(Range<usize>),
    Placeholder(Placeholder<'s>),
}

/// Scan the statement left to right, yielding literals and placeholders in occurrence order.
pub fn tokenize(sql: &str) -> impl Iterator<Item = Token<'_>> {
    TOKEN.captures_iter(sql).map(|captures| {
        let whole = captures.get(0).expect("capture 0 is always the whole match");
        match captures.get(1) {
            Some(name) => Token::Placeholder(Placeholder {
                name: name.as_str(),
                start: whole.start(),
                end: whole.end(),
            }),
            None => Token::Literal(whole.range()),
        }
    })
}

/// A statement where every named placeholder was replaced by `?`.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub sql: String,
    /// Names in the order of the `?` they replaced.
    pub parameters: ParameterTable,
}

/// Replace each `@name` outside of quoted literals with `?`.
///
/// Everything else, quoted literals included, is copied unchanged.
///
/// ```rust
/// let rewritten = sigil_core::rewrite("SELECT * FROM t WHERE a=@x AND b='lit@eral' AND c=@y");
/// assert_eq!(rewritten.sql, "SELECT * FROM t WHERE a=? AND b='lit@eral' AND c=?");
/// assert_eq!(rewritten.parameters.names(), ["x", "y"]);
/// ```
pub fn rewrite(sql: &str) -> Rewritten {
    let mut result = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut last = 0;
    for token in tokenize(sql) {
        if let Token::Placeholder(placeholder) = token {
            result.push_str(&sql[last..placeholder.start]);
            result.push('?');
            names.push(placeholder.name.to_owned());
            last = placeholder.end;
        }
    }
    result.push_str(&sql[last..]);
    log::debug!(
        "Rewrote {} named parameter(s):\n{}\ninto:\n{}",
        names.len(),
        truncate_long!(sql),
        truncate_long!(result)
    );
    Rewritten {
        sql: result,
        parameters: names.into_iter().collect(),
    }
}

impl Display for Rewritten {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}
