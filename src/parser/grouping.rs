//! Grouping of a statement's flat token stream into a tree.
//!
//! Passes run in a fixed order over every token list, innermost lists
//! first: parentheses are built while nesting, then comments, `CASE`
//! blocks, function calls, `WHERE` clauses, identifiers, comparisons and
//! finally comma-separated lists.

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::tokens::{Token, TokenKind};
use crate::tree::{Group, GroupKind, Node};

use super::MAX_NESTING_DEPTH;

/// Keywords which end a `WHERE` clause.
const WHERE_CLOSERS: &[&str] = &[
    "ORDER BY",
    "GROUP BY",
    "LIMIT",
    "OFFSET",
    "UNION",
    "UNION ALL",
    "EXCEPT",
    "INTERSECT",
    "HAVING",
    "RETURNING",
    "INTO",
    "FOR",
    "WINDOW",
];

/// Build the tree for one statement's tokens.
pub(super) fn statement(tokens: Vec<Token>) -> Group {
    let (children, _) = nest(&mut tokens.into_iter(), 0);
    Group::new(GroupKind::Statement, group_tokens(children, 0))
}

/// Fold `(` ... `)` runs into parenthesis groups, returning the nodes and
/// whether a `)` ended this level.
///
/// Past [`MAX_NESTING_DEPTH`] an opening paren stays a plain token. So does
/// one never closed, its contents rejoining the enclosing list.
fn nest<I: Iterator<Item = Token>>(tokens: &mut I, depth: usize) -> (Vec<Node>, bool) {
    let mut nodes = Vec::new();
    while let Some(token) = tokens.next() {
        if token.is_punctuation("(") && depth < MAX_NESTING_DEPTH {
            let (inner, closed) = nest(tokens, depth + 1);
            if closed {
                let mut children = vec![Node::Token(token)];
                children.extend(inner);
                nodes.push(parenthesis(children, depth + 1).into());
            } else {
                nodes.push(token.into());
                nodes.extend(inner);
            }
        } else if depth > 0 && token.is_punctuation(")") {
            nodes.push(token.into());
            return (nodes, true);
        } else {
            nodes.push(token.into());
        }
    }
    (nodes, false)
}

/// Group the contents of a closed `(` ... `)` run.
fn parenthesis(mut children: Vec<Node>, depth: usize) -> Group {
    let close = children.pop();
    let inner = children.split_off(1);
    children.extend(group_tokens(inner, depth));
    children.extend(close);
    Group::new(GroupKind::Parenthesis, children)
}

fn group_tokens(nodes: Vec<Node>, depth: usize) -> Vec<Node> {
    let nodes = group_comments(nodes);
    let nodes = group_cases(nodes, depth);
    let nodes = group_functions(nodes);
    let nodes = group_where(nodes, depth);
    let nodes = group_identifiers(nodes);
    let nodes = group_comparisons(nodes);
    group_identifier_lists(nodes)
}

fn is_keyword(node: &Node, keyword: &str) -> bool {
    node.as_token()
        .is_some_and(|token| token.is_keyword_like(keyword))
}

fn is_comment_token(node: &Node) -> bool {
    node.kind().is_some_and(TokenKind::is_comment)
}

fn first_significant(queue: &VecDeque<Node>) -> Option<usize> {
    queue.iter().position(|node| !node.is_whitespace())
}

fn last_significant(out: &[Node]) -> Option<usize> {
    out.iter().rposition(|node| !node.is_whitespace())
}

fn group_comments(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = VecDeque::from(nodes);
    let mut out = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        if !is_comment_token(&node) {
            out.push(node);
            continue;
        }
        let mut children = vec![node];
        while let Some(next) = first_significant(&queue) {
            if !is_comment_token(&queue[next]) {
                break;
            }
            children.extend(queue.drain(..=next));
        }
        out.push(Group::new(GroupKind::Comment, children).into());
    }
    out
}

/// For each `CASE` among `nodes`, the index of the `END` closing it.
fn matching_ends(nodes: &[Node]) -> Vec<Option<usize>> {
    let mut ends = vec![None; nodes.len()];
    let mut open = Vec::new();
    for (at, node) in nodes.iter().enumerate() {
        if is_keyword(node, "CASE") {
            open.push(at);
        } else if is_keyword(node, "END") {
            if let Some(case) = open.pop() {
                ends[case] = Some(at);
            }
        }
    }
    ends
}

fn group_cases(nodes: Vec<Node>, depth: usize) -> Vec<Node> {
    if depth >= MAX_NESTING_DEPTH {
        return nodes;
    }
    let ends = matching_ends(&nodes);
    let mut out = Vec::with_capacity(nodes.len());
    let mut nodes = nodes.into_iter().enumerate();
    while let Some((at, node)) = nodes.next() {
        let Some(end) = ends[at] else {
            out.push(node);
            continue;
        };
        let mut inner: Vec<Node> = nodes.by_ref().take(end - at).map(|(_, node)| node).collect();
        let close = inner.pop();
        let mut children = vec![node];
        children.extend(group_tokens(inner, depth + 1));
        children.extend(close);
        out.push(Group::new(GroupKind::Case, children).into());
    }
    out
}

fn group_functions(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = VecDeque::from(nodes);
    let mut out = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        let calls = node.kind() == Some(TokenKind::Name)
            && queue
                .front()
                .is_some_and(|next| next.is_group(GroupKind::Parenthesis));
        if calls {
            let mut children = vec![node];
            children.extend(queue.pop_front());
            out.push(Group::new(GroupKind::Function, children).into());
        } else {
            out.push(node);
        }
    }
    out
}

fn closes_where(node: &Node) -> bool {
    WHERE_CLOSERS.iter().any(|keyword| is_keyword(node, keyword))
}

fn group_where(nodes: Vec<Node>, depth: usize) -> Vec<Node> {
    if depth >= MAX_NESTING_DEPTH {
        return nodes;
    }
    let mut queue = VecDeque::from(nodes);
    let mut out = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        if !is_keyword(&node, "WHERE") {
            out.push(node);
            continue;
        }
        let close = queue.iter().position(closes_where).unwrap_or(queue.len());
        // Trailing whitespace stays outside the clause.
        let end = queue
            .range(..close)
            .rposition(|node| !node.is_whitespace())
            .map_or(0, |at| at + 1);
        let content: Vec<Node> = queue.drain(..end).collect();
        let mut children = vec![node];
        children.extend(group_tokens(content, depth + 1));
        out.push(Group::new(GroupKind::Where, children).into());
    }
    out
}

fn is_name_part(node: &Node) -> bool {
    node.kind().is_some_and(|kind| {
        matches!(
            kind,
            TokenKind::Name | TokenKind::Symbol | TokenKind::Wildcard
        )
    })
}

fn is_dot(node: Option<&Node>) -> bool {
    node.and_then(Node::as_token)
        .is_some_and(|token| token.is_punctuation("."))
}

/// Length of an `AS alias` or `ASC`/`DESC` suffix at the queue front.
fn suffix_len(queue: &VecDeque<Node>) -> Option<usize> {
    let mut at = usize::from(queue.front().is_some_and(Node::is_whitespace));
    let keyword = queue.get(at)?;
    if is_keyword(keyword, "ASC") || is_keyword(keyword, "DESC") {
        return Some(at + 1);
    }
    if !is_keyword(keyword, "AS") {
        return None;
    }
    at += 1;
    if queue.get(at).is_some_and(Node::is_whitespace) {
        at += 1;
    }
    queue
        .get(at)
        .and_then(Node::kind)
        .filter(|kind| matches!(kind, TokenKind::Name | TokenKind::Symbol))
        .map(|_| at + 1)
}

fn group_identifiers(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = VecDeque::from(nodes);
    let mut out = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        let is_name = node
            .kind()
            .is_some_and(|kind| matches!(kind, TokenKind::Name | TokenKind::Symbol));
        let is_aliasable = node.as_group().is_some_and(|group| {
            matches!(
                group.kind,
                GroupKind::Function | GroupKind::Parenthesis | GroupKind::Case
            )
        });

        if is_name {
            let mut children = vec![node];
            while is_dot(queue.front()) && queue.get(1).is_some_and(is_name_part) {
                children.extend(queue.drain(..2));
            }
            if let Some(len) = suffix_len(&queue) {
                children.extend(queue.drain(..len));
            }
            out.push(Group::new(GroupKind::Identifier, children).into());
        } else if let (true, Some(len)) = (is_aliasable, suffix_len(&queue)) {
            let mut children = vec![node];
            children.extend(queue.drain(..len));
            out.push(Group::new(GroupKind::Identifier, children).into());
        } else {
            out.push(node);
        }
    }
    out
}

fn is_operand(node: &Node) -> bool {
    match node {
        Node::Group(group) => matches!(
            group.kind,
            GroupKind::Identifier | GroupKind::Function | GroupKind::Parenthesis | GroupKind::Case
        ),
        Node::Token(token) => {
            token.kind.is_deletable()
                || matches!(
                    token.kind,
                    TokenKind::Name | TokenKind::Symbol | TokenKind::Placeholder
                )
                || ["NULL", "TRUE", "FALSE"]
                    .iter()
                    .any(|keyword| token.is_keyword_like(keyword))
        }
    }
}

fn group_comparisons(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = VecDeque::from(nodes);
    let mut out: Vec<Node> = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        if node.kind() != Some(TokenKind::Comparison) {
            out.push(node);
            continue;
        }
        match (last_significant(&out), first_significant(&queue)) {
            (Some(lhs), Some(rhs)) if is_operand(&out[lhs]) && is_operand(&queue[rhs]) => {
                let mut children: Vec<Node> = out.drain(lhs..).collect();
                children.push(node);
                children.extend(queue.drain(..=rhs));
                out.push(Group::new(GroupKind::Comparison, children).into());
            }
            _ => out.push(node),
        }
    }
    out
}

fn is_list_member(node: &Node) -> bool {
    match node {
        Node::Group(group) => matches!(
            group.kind,
            GroupKind::Identifier
                | GroupKind::Function
                | GroupKind::Case
                | GroupKind::Comparison
                | GroupKind::IdentifierList
        ),
        Node::Token(token) => {
            token.kind.is_deletable()
                || token.is_keyword()
                || token.kind.is_comment()
                || matches!(
                    token.kind,
                    TokenKind::Name
                        | TokenKind::Symbol
                        | TokenKind::Placeholder
                        | TokenKind::Wildcard
                )
        }
    }
}

fn group_identifier_lists(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = VecDeque::from(nodes);
    let mut out: Vec<Node> = Vec::with_capacity(queue.len());
    while let Some(node) = queue.pop_front() {
        let is_comma = node
            .as_token()
            .is_some_and(|token| token.is_punctuation(","));
        if !is_comma {
            out.push(node);
            continue;
        }
        match (last_significant(&out), first_significant(&queue)) {
            (Some(lhs), Some(rhs)) if is_list_member(&out[lhs]) && is_list_member(&queue[rhs]) => {
                let gap: Vec<Node> = out.drain(lhs + 1..).collect();
                let mut list = match out.pop() {
                    Some(Node::Group(group)) if group.kind == GroupKind::IdentifierList => group,
                    first => Group::new(GroupKind::IdentifierList, first.into_iter().collect()),
                };
                list.children.extend(gap);
                list.children.push(node);
                list.children.extend(queue.drain(..=rhs));
                out.push(list.into());
            }
            _ => out.push(node),
        }
    }
    out
}
