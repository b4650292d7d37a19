//! Leaf tokens of a parsed statement.

use alloc::string::String;

/// The type tag carried by every leaf token.
///
/// The set is closed: every byte of the input lexes into exactly one of these
/// kinds, and concatenating token values reproduces the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A run of spaces or tabs.
    Whitespace,
    /// A run of whitespace containing at least one line break.
    Newline,
    /// `-- ...` comment, including its terminating line break.
    CommentSingle,
    /// `/* ... */` comment.
    CommentMultiline,
    /// A general keyword such as `FROM`, `WHERE` or `ORDER BY`.
    Keyword,
    /// Data manipulation keyword (`SELECT`, `INSERT`, `UPDATE`, ...).
    Dml,
    /// Data definition keyword (`CREATE`, `ALTER`, `DROP`, ...).
    Ddl,
    /// Common table expression keyword (`WITH`).
    Cte,
    /// An unquoted or backtick-quoted name.
    Name,
    /// A query parameter placeholder (`%s`, `?`, `:name`, `$1`).
    Placeholder,
    /// A double-quoted identifier.
    Symbol,
    /// Numeric literal of unspecified shape.
    Number,
    /// Integer literal.
    Integer,
    /// Floating point literal.
    Float,
    /// Hexadecimal literal (`0x1F`).
    Hexadecimal,
    /// String literal of unspecified quoting.
    String,
    /// Single-quoted string literal.
    StringSingle,
    /// Comparison operator (`=`, `<>`, `>=`, ...).
    Comparison,
    /// Any other operator.
    Operator,
    /// `*`.
    Wildcard,
    /// Parentheses, commas, semicolons, dots and brackets.
    Punctuation,
    /// A character the lexer could not classify.
    Error,
}

impl TokenKind {
    /// Whether this kind is whitespace (including line breaks).
    #[must_use]
    pub const fn is_whitespace(self) -> bool {
        matches!(self, Self::Whitespace | Self::Newline)
    }

    /// Whether this kind is a comment.
    #[must_use]
    pub const fn is_comment(self) -> bool {
        matches!(self, Self::CommentSingle | Self::CommentMultiline)
    }

    /// Whether this kind is any keyword class.
    #[must_use]
    pub const fn is_keyword(self) -> bool {
        matches!(self, Self::Keyword | Self::Dml | Self::Ddl | Self::Cte)
    }

    /// Whether this kind is a literal value that fingerprinting masks.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Float
                | Self::Integer
                | Self::Hexadecimal
                | Self::String
                | Self::StringSingle
        )
    }
}

/// A leaf of the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The type tag.
    pub kind: TokenKind,
    /// The text of the token. Rewritten in place by normalization.
    pub value: String,
}

impl Token {
    /// Create a new token.
    #[must_use]
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// Whether this token is whitespace.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind.is_whitespace()
    }

    /// Whether this token is a keyword.
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    /// Whether this token is the given punctuation character.
    #[must_use]
    pub fn is_punctuation(&self, text: &str) -> bool {
        self.kind == TokenKind::Punctuation && self.value == text
    }

    /// Whether this token is a keyword whose words match `keyword`,
    /// ignoring case and the amount of whitespace between words.
    #[must_use]
    pub fn is_keyword_like(&self, keyword: &str) -> bool {
        self.is_keyword() && words_eq_ignore_case(&self.value, keyword)
    }
}

/// Compare two strings word by word, ignoring ASCII case and whitespace runs.
pub(crate) fn words_eq_ignore_case(left: &str, right: &str) -> bool {
    let mut left = left.split_whitespace();
    let mut right = right.split_whitespace();
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(r) => {}
            (None, None) => return true,
            _ => return false,
        }
    }
}
