//! Whitespace normalization of a token tree.

use alloc::vec::Vec;

use crate::tree::{Group, GroupKind, Node};

/// Collapse whitespace in `group` and all of its descendants, in place.
///
/// Children are normalized before their parent. Within each group a run of
/// whitespace tokens becomes a single space followed by empty tokens, and
/// multi-word keywords are re-spaced with single spaces. Parentheses also
/// drop the whitespace hugging their opening and closing tokens. Comment
/// groups are left untouched.
pub fn normalize_whitespace(group: &mut Group) -> &mut Group {
    for child in &mut group.children {
        if let Node::Group(sublist) = child {
            normalize_whitespace(sublist);
        }
    }

    if group.kind == GroupKind::Comment {
        return group;
    }

    strip(&mut group.children);

    if group.kind == GroupKind::Parenthesis {
        trim(&mut group.children, Edge::Open);
        trim(&mut group.children, Edge::Close);
    }

    group
}

fn strip(children: &mut [Node]) {
    let mut in_whitespace = false;
    for child in children {
        let Node::Token(token) = child else {
            in_whitespace = false;
            continue;
        };
        if token.is_whitespace() {
            token.value.clear();
            if !in_whitespace {
                token.value.push(' ');
            }
            in_whitespace = true;
        } else {
            if token.is_keyword() && token.value.contains(|c: char| c.is_ascii_whitespace()) {
                token.value = token
                    .value
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ");
            }
            in_whitespace = false;
        }
    }
}

/// Which paren of a parenthesis group to trim whitespace next to.
#[derive(Clone, Copy)]
enum Edge {
    Open,
    Close,
}

/// Remove whitespace children right inside the given paren. Stops once only
/// the paren tokens themselves would remain.
fn trim(children: &mut Vec<Node>, edge: Edge) {
    loop {
        let (at, reserved) = match edge {
            Edge::Open => (1, 1),
            Edge::Close => (children.len().saturating_sub(2), 2),
        };
        if children.len() <= reserved || !children[at].is_whitespace() {
            return;
        }
        children.remove(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use alloc::string::{String, ToString};

    fn normalized(sql: &str) -> String {
        let mut statement = parse(sql).remove(0);
        normalize_whitespace(&mut statement).to_string().trim().into()
    }

    #[test]
    fn test_collapses_runs() {
        assert_eq!(
            normalized("SELECT  a,\n\tb   FROM    t"),
            "SELECT a, b FROM t"
        );
    }

    #[test]
    fn test_parenthesis_hugs_content() {
        assert_eq!(
            normalized("SELECT ( COUNT( * ) ) FROM t"),
            "SELECT (COUNT(*)) FROM t"
        );
        assert_eq!(normalized("SELECT (   )"), "SELECT ()");
    }

    #[test]
    fn test_comment_kept_verbatim() {
        assert_eq!(
            normalized("SELECT /* a   b */   /* c */ x"),
            "SELECT /* a   b */   /* c */ x"
        );
    }

    #[test]
    fn test_multi_word_keyword_respaced() {
        assert_eq!(
            normalized("SELECT a FROM t ORDER\n   BY a"),
            "SELECT a FROM t ORDER BY a"
        );
    }

    #[test]
    fn test_adjacent_whitespace_tokens() {
        let mut group = Group::new(
            GroupKind::Statement,
            alloc::vec![
                Node::token(crate::TokenKind::Name, "a"),
                Node::token(crate::TokenKind::Whitespace, "  "),
                Node::token(crate::TokenKind::Newline, "\n"),
                Node::token(crate::TokenKind::Name, "b"),
            ],
        );
        normalize_whitespace(&mut group);
        let values: Vec<&str> = group
            .children
            .iter()
            .filter_map(Node::as_token)
            .map(|token| token.value.as_str())
            .collect();
        assert_eq!(values, ["a", " ", "", "b"]);
    }

    #[test]
    fn test_unclosed_parenthesis_is_not_trimmed() {
        assert_eq!(normalized("SELECT ( a "), "SELECT ( a");
        assert_eq!(normalized("SELECT (a  b"), "SELECT (a b");
    }
}
