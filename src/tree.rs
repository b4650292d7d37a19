//! The owned token tree produced by [`parse`](crate::parse).
//!
//! Every [`Group`] exclusively owns its children; passes take `&mut Group`
//! and rewrite children in place, never reordering them.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display};

use crate::tokens::{Token, TokenKind};

/// The structural role of a [`Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// A whole statement; always the tree root.
    Statement,
    /// `( ... )`, including both paren tokens.
    Parenthesis,
    /// One or more adjacent comments.
    Comment,
    /// A (possibly dotted or aliased) name.
    Identifier,
    /// A comma-separated list.
    IdentifierList,
    /// A function call: name followed by its argument parenthesis.
    Function,
    /// A `WHERE` clause.
    Where,
    /// `lhs <op> rhs`.
    Comparison,
    /// `CASE ... END`.
    Case,
}

/// A node of the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A leaf token.
    Token(Token),
    /// A group of nodes.
    Group(Group),
}

/// An ordered sequence of child nodes with a structural role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The structural role.
    pub kind: GroupKind,
    /// The ordered children.
    pub children: Vec<Node>,
}

impl Group {
    /// Create a new group.
    #[must_use]
    pub fn new(kind: GroupKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    /// Whether the first child's text is exactly `text`.
    #[must_use]
    pub fn starts_with_text(&self, text: &str) -> bool {
        self.children.first().is_some_and(|child| child.text_eq(text))
    }

    /// Iterate over the children which are themselves groups.
    pub fn sublists(&self) -> impl Iterator<Item = &Group> {
        self.children.iter().filter_map(Node::as_group)
    }
}

impl Node {
    /// Shorthand for a leaf node.
    #[must_use]
    pub fn token(kind: TokenKind, value: impl Into<String>) -> Self {
        Self::Token(Token::new(kind, value))
    }

    /// The leaf token, if this node is one.
    #[must_use]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Group(_) => None,
        }
    }

    /// Mutable access to the leaf token, if this node is one.
    pub fn as_token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Self::Token(token) => Some(token),
            Self::Group(_) => None,
        }
    }

    /// The group, if this node is one.
    #[must_use]
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Token(_) => None,
        }
    }

    /// Mutable access to the group, if this node is one.
    pub fn as_group_mut(&mut self) -> Option<&mut Group> {
        match self {
            Self::Group(group) => Some(group),
            Self::Token(_) => None,
        }
    }

    /// Whether this node is a group of the given kind.
    #[must_use]
    pub fn is_group(&self, kind: GroupKind) -> bool {
        self.as_group().is_some_and(|group| group.kind == kind)
    }

    /// Whether this node is a whitespace token.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.as_token().is_some_and(Token::is_whitespace)
    }

    /// The token kind of a leaf, `None` for groups.
    #[must_use]
    pub fn kind(&self) -> Option<TokenKind> {
        self.as_token().map(|token| token.kind)
    }

    /// Whether the rendered text of this node equals `expected`.
    ///
    /// Groups are compared leaf by leaf without building the rendered string.
    #[must_use]
    pub fn text_eq(&self, expected: &str) -> bool {
        let mut rest = expected;
        self.consume_prefix(&mut rest) && rest.is_empty()
    }

    fn consume_prefix(&self, rest: &mut &str) -> bool {
        match self {
            Self::Token(token) => match rest.strip_prefix(token.value.as_str()) {
                Some(remaining) => {
                    *rest = remaining;
                    true
                }
                None => false,
            },
            Self::Group(group) => group.children.iter().all(|child| child.consume_prefix(rest)),
        }
    }
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Self::Token(token)
    }
}

impl From<Group> for Node {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token(token) => f.write_str(&token.value),
            Self::Group(group) => group.fmt(f),
        }
    }
}

impl Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for child in &self.children {
            child.fmt(f)?;
        }
        Ok(())
    }
}
