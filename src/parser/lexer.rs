//! SQL lexer for tokenizing input.
//!
//! The lexer is lossless: concatenating the values of every produced token
//! reproduces the input byte for byte. Bytes it cannot classify become
//! [`TokenKind::Error`] tokens instead of failing.

use crate::tokens::{Token, TokenKind};

use super::keywords::{COMPOUND_KEYWORDS, classify};

/// SQL lexer that produces tokens from input.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    /// Whether the last significant token can end an operand, which decides
    /// whether a following `-` is a sign or a binary operator.
    operand_ended: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            operand_ended: false,
        }
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    /// Whether the byte right before the cursor closes a name or a group.
    fn follows_name(&self) -> bool {
        self.pos
            .checked_sub(1)
            .map(|at| self.input.as_bytes()[at])
            .is_some_and(|b| is_ident_cont(b) || matches!(b, b'"' | b'`' | b')' | b']'))
    }

    fn advance_while(&mut self, predicate: impl Fn(u8) -> bool) {
        let bytes = self.input.as_bytes();
        while self.pos < bytes.len() && predicate(bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn scan(&mut self) -> TokenKind {
        let b = self.input.as_bytes()[self.pos];
        match b {
            _ if b.is_ascii_whitespace() => self.scan_whitespace(),
            b'-' if self.peek(1) == Some(b'-') => self.scan_line_comment(),
            b'/' if self.peek(1) == Some(b'*') => self.scan_block_comment(),
            b'\'' => self.scan_quoted(b'\'', TokenKind::StringSingle),
            b'"' => self.scan_quoted(b'"', TokenKind::Symbol),
            b'`' => self.scan_quoted(b'`', TokenKind::Name),
            b'0' if matches!(self.peek(1), Some(b'x' | b'X'))
                && self.peek(2).is_some_and(|c| c.is_ascii_hexdigit()) =>
            {
                self.pos += 2;
                self.advance_while(|c| c.is_ascii_hexdigit());
                self.finish_number(TokenKind::Hexadecimal)
            }
            b'0'..=b'9' => self.scan_number(),
            b'.' if !self.follows_name() && self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number()
            }
            b'-' if !self.operand_ended && self.starts_unsigned_number(1) => {
                self.pos += 1;
                self.scan_number()
            }
            b'%' => self.scan_percent(),
            b'?' => {
                self.pos += 1;
                TokenKind::Placeholder
            }
            b':' => self.scan_colon(),
            b'$' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.pos += 1;
                self.advance_while(|c| c.is_ascii_digit());
                TokenKind::Placeholder
            }
            _ if is_ident_start(b) => self.scan_word(),
            b'(' | b')' | b',' | b';' | b'.' | b'[' | b']' => {
                self.pos += 1;
                TokenKind::Punctuation
            }
            b'*' => {
                self.pos += 1;
                TokenKind::Wildcard
            }
            b'=' | b'<' | b'>' | b'!' => self.scan_comparison(),
            b'+' | b'-' | b'/' | b'|' | b'&' | b'^' | b'~' | b'#' | b'@' => {
                self.pos += 1;
                if b == b'|' && self.peek(0) == Some(b'|') {
                    self.pos += 1;
                }
                TokenKind::Operator
            }
            _ => {
                self.pos += 1;
                TokenKind::Error
            }
        }
    }

    fn scan_whitespace(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_whitespace());
        if self.input[start..self.pos].contains(['\n', '\r']) {
            TokenKind::Newline
        } else {
            TokenKind::Whitespace
        }
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        self.advance_while(|c| c != b'\n' && c != b'\r');
        if self.peek(0) == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek(0) == Some(b'\n') {
            self.pos += 1;
        }
        TokenKind::CommentSingle
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        match self.input[self.pos + 2..].find("*/") {
            Some(end) => self.pos += 2 + end + 2,
            None => self.pos = self.input.len(),
        }
        TokenKind::CommentMultiline
    }

    /// Scan a quoted token. A doubled quote escapes itself; inside single
    /// quoted strings a backslash escapes the next byte too. An unterminated
    /// quote lexes as a one-byte error token.
    fn scan_quoted(&mut self, quote: u8, kind: TokenKind) -> TokenKind {
        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut pos = start + 1;
        while pos < bytes.len() {
            let b = bytes[pos];
            if b == b'\\' && quote == b'\'' {
                pos += 2;
            } else if b == quote {
                if bytes.get(pos + 1) == Some(&quote) {
                    pos += 2;
                } else {
                    self.pos = pos + 1;
                    return kind;
                }
            } else {
                pos += 1;
            }
        }
        self.pos = start + 1;
        TokenKind::Error
    }

    fn starts_unsigned_number(&self, offset: usize) -> bool {
        match self.peek(offset) {
            Some(b'0'..=b'9') => true,
            Some(b'.') => self.peek(offset + 1).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Integer;
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek(0) == Some(b'.') {
            kind = TokenKind::Float;
            self.pos += 1;
            self.advance_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(0), Some(b'e' | b'E')) {
            let digits_at = if matches!(self.peek(1), Some(b'+' | b'-')) {
                2
            } else {
                1
            };
            if self.peek(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                kind = TokenKind::Float;
                self.pos += digits_at;
                self.advance_while(|c| c.is_ascii_digit());
            }
        }

        self.finish_number(kind)
    }

    /// Digits running straight into identifier characters form a name.
    fn finish_number(&mut self, kind: TokenKind) -> TokenKind {
        if self.peek(0).is_some_and(is_ident_cont) {
            self.advance_while(is_ident_cont);
            TokenKind::Name
        } else {
            kind
        }
    }

    fn scan_percent(&mut self) -> TokenKind {
        self.pos += 1;
        match self.peek(0) {
            Some(b's') if !self.peek(1).is_some_and(is_ident_cont) => {
                self.pos += 1;
                TokenKind::Placeholder
            }
            Some(b'(') => {
                let name_end = self.input.as_bytes()[self.pos + 1..]
                    .iter()
                    .position(|&c| !is_ident_cont(c))
                    .map_or(self.input.len(), |len| self.pos + 1 + len);
                if self.input[name_end..].starts_with(")s") {
                    self.pos = name_end + 2;
                    TokenKind::Placeholder
                } else {
                    TokenKind::Operator
                }
            }
            _ => TokenKind::Operator,
        }
    }

    fn scan_colon(&mut self) -> TokenKind {
        self.pos += 1;
        match self.peek(0) {
            Some(b':') => {
                self.pos += 1;
                TokenKind::Punctuation
            }
            Some(c) if is_ident_start(c) => {
                self.advance_while(is_ident_cont);
                TokenKind::Placeholder
            }
            _ => TokenKind::Punctuation,
        }
    }

    fn scan_comparison(&mut self) -> TokenKind {
        let first = self.input.as_bytes()[self.pos];
        self.pos += 1;
        match (first, self.peek(0)) {
            (b'<', Some(b'=' | b'>')) | (b'>' | b'!' | b'=', Some(b'=')) => {
                self.pos += 1;
                TokenKind::Comparison
            }
            (b'<', Some(b'<')) | (b'>', Some(b'>')) => {
                self.pos += 1;
                TokenKind::Operator
            }
            (b'!', _) => TokenKind::Operator,
            _ => TokenKind::Comparison,
        }
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        self.advance_while(is_ident_cont);

        if start > 0 && self.input.as_bytes()[start - 1] == b'.' {
            return TokenKind::Name;
        }

        let upper = self.input[start..self.pos].to_ascii_uppercase();
        if let Some(end) = self.compound_keyword_end(&upper) {
            self.pos = end;
            return TokenKind::Keyword;
        }

        match classify(&upper) {
            Some(TokenKind::Dml | TokenKind::Ddl) if self.peek(0) == Some(b'(') => TokenKind::Name,
            Some(kind) => kind,
            None => TokenKind::Name,
        }
    }

    /// Find the end of the longest multi-word keyword starting with `first`.
    fn compound_keyword_end(&self, first: &str) -> Option<usize> {
        let (_, continuations) = COMPOUND_KEYWORDS
            .iter()
            .find(|(leading, _)| *leading == first)?;
        continuations
            .iter()
            .find_map(|words| self.match_words(self.pos, words))
    }

    /// Match whitespace-separated `words` starting at `pos`, returning the end.
    fn match_words(&self, mut pos: usize, words: &[&str]) -> Option<usize> {
        let bytes = self.input.as_bytes();
        for word in words {
            let gap_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
                pos += 1;
            }
            if pos == gap_start {
                return None;
            }
            let word_start = pos;
            while pos < bytes.len() && is_ident_cont(bytes[pos]) {
                pos += 1;
            }
            if !self.input[word_start..pos].eq_ignore_ascii_case(word) {
                return None;
            }
        }
        Some(pos)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }
        let start = self.pos;
        let kind = self.scan();
        let value = &self.input[start..self.pos];
        if !kind.is_whitespace() && !kind.is_comment() {
            self.operand_ended = ends_operand(kind, value);
        }
        Some(Token::new(kind, value))
    }
}

fn ends_operand(kind: TokenKind, value: &str) -> bool {
    match kind {
        TokenKind::Punctuation => value == ")" || value == "]",
        TokenKind::Name | TokenKind::Symbol | TokenKind::Placeholder => true,
        _ => kind.is_deletable(),
    }
}

/// Check if a byte can start an identifier. Non-ASCII bytes are always
/// identifier bytes, which keeps every slice on a char boundary.
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

/// Check if a byte can continue an identifier.
fn is_ident_cont(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}
