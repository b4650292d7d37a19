//! SQL tokenizer and grouper.
//!
//! This is intentionally limited compared to a full SQL parser: it does not
//! validate statements, it only classifies tokens and folds them into the
//! nested groups fingerprinting rules need:
//! - parentheses, comments and `CASE ... END` blocks
//! - function calls and `WHERE` clauses
//! - identifiers (dotted, aliased, with `ASC`/`DESC`)
//! - comparisons and comma-separated lists
//!
//! Parsing never fails. Unknown characters become error tokens and
//! unbalanced parentheses are left as they are.

mod grouping;
mod keywords;
mod lexer;

use alloc::vec::Vec;

pub use lexer::Lexer;

use crate::tokens::Token;
use crate::tree::Group;

/// How deep parentheses, `CASE` blocks and `WHERE` clauses may nest before
/// further openers are kept as plain tokens. Bounds recursion on hostile input.
pub const MAX_NESTING_DEPTH: usize = 100;

/// Iterator over the statements of a SQL string.
///
/// Statements end after a top-level `;`. Statements made only of whitespace
/// are skipped, so blank input yields nothing.
pub struct Statements<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Statements<'a> {
    /// Create an iterator over the statements of `sql`.
    #[must_use]
    pub fn new(sql: &'a str) -> Self {
        Self {
            lexer: Lexer::new(sql),
        }
    }
}

impl Iterator for Statements<'_> {
    type Item = Group;

    fn next(&mut self) -> Option<Group> {
        loop {
            let mut tokens = Vec::new();
            let mut depth = 0usize;
            for token in self.lexer.by_ref() {
                let terminates = depth == 0 && token.is_punctuation(";");
                if token.is_punctuation("(") {
                    depth += 1;
                } else if token.is_punctuation(")") {
                    depth = depth.saturating_sub(1);
                }
                tokens.push(token);
                if terminates {
                    break;
                }
            }
            if tokens.is_empty() {
                return None;
            }
            if !tokens.iter().all(Token::is_whitespace) {
                return Some(grouping::statement(tokens));
            }
        }
    }
}

/// Parse `sql` into one tree per statement.
#[must_use]
pub fn parse(sql: &str) -> Vec<Group> {
    Statements::new(sql).collect()
}
