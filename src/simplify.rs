//! Structural simplification of a normalized token tree.
//!
//! Rules are checked on each group before recursing into its children:
//!
//! 1. `UPDATE ... SET <assignments> [WHERE ...]` loses its assignments.
//! 2. `IN (<literals>)` inside a `WHERE` clause collapses to `IN (...)`.
//! 3. Savepoint names in `SAVEPOINT`, `RELEASE SAVEPOINT` and
//!    `ROLLBACK TO SAVEPOINT` become `` `#` ``.
//! 4. Server-side cursor names `"_django_curs_<n>"` become `"_django_curs_#"`.
//! 5. Column lists collapse to `...` (unless they follow `ORDER BY`,
//!    `GROUP BY` or `HAVING`), and literals and `NULL` become `#`.

use alloc::vec;

use tracing::trace;

use crate::errors::Error;
use crate::tokens::TokenKind;
use crate::tree::{Group, GroupKind, Node};

/// Replaces a collapsed `UPDATE` assignment list.
pub const ASSIGNMENTS_PLACEHOLDER: &str = " ... ";
/// Replaces a collapsed column or value list.
pub const LIST_PLACEHOLDER: &str = "...";
/// Replaces a literal value or `NULL`.
pub const VALUE_PLACEHOLDER: &str = "#";
/// Replaces a savepoint name.
pub const SAVEPOINT_PLACEHOLDER: &str = "`#`";
/// Replaces a volatile server-side cursor name.
pub const CURSOR_PLACEHOLDER: &str = "\"_django_curs_#\"";

const CURSOR_PREFIX: &str = "\"_django_curs_";

/// Keywords after which a column list is kept as is.
const LIST_KEEPING_KEYWORDS: [&str; 3] = ["ORDER BY", "GROUP BY", "HAVING"];

const ROLLBACK_TO_SAVEPOINT: [&str; 6] = ["ROLLBACK", " ", "TO", " ", "SAVEPOINT", " "];

/// Simplify `group` in place, masking literals, column lists and volatile
/// names.
///
/// Expects a tree already passed through
/// [`normalize_whitespace`](crate::normalize_whitespace): the
/// `ROLLBACK TO SAVEPOINT` rule matches single-space separators.
///
/// # Errors
///
/// Returns an [`Error`] when a group matches a rule's leading keyword but not
/// the rest of the shape the rule expects, e.g. `UPDATE` without `SET`.
pub fn simplify(group: &mut Group, hide_columns: bool) -> Result<(), Error> {
    erase_update_assignments(group)?;
    collapse_in_lists(group)?;
    if erase_savepoint_name(group)? {
        return Ok(());
    }
    erase_cursor_name(group);

    let mut after_list_keeping_keyword = false;
    for child in &mut group.children {
        match child {
            Node::Group(sublist)
                if hide_columns
                    && sublist.kind == GroupKind::IdentifierList
                    && !after_list_keeping_keyword =>
            {
                trace!(items = sublist.children.len(), "collapsing identifier list");
                sublist.children = vec![placeholder(LIST_PLACEHOLDER)];
            }
            Node::Group(sublist) => simplify(sublist, hide_columns)?,
            Node::Token(token) if token.kind.is_deletable() || token.value == "NULL" => {
                token.value = VALUE_PLACEHOLDER.into();
            }
            Node::Token(_) => {}
        }

        if !child.is_whitespace() {
            after_list_keeping_keyword = child.as_token().is_some_and(|token| {
                LIST_KEEPING_KEYWORDS
                    .iter()
                    .any(|keyword| token.is_keyword_like(keyword))
            });
        }
    }
    Ok(())
}

fn placeholder(text: &str) -> Node {
    Node::token(TokenKind::Punctuation, text)
}

/// Replace everything between `SET` and the `WHERE` clause (or the end).
fn erase_update_assignments(group: &mut Group) -> Result<(), Error> {
    if !group.starts_with_text("UPDATE") {
        return Ok(());
    }
    let set = group
        .children
        .iter()
        .position(|child| child.text_eq("SET"))
        .ok_or(Error::MissingSet)?;
    let end = group.children[set + 1..]
        .iter()
        .position(|child| {
            child
                .as_group()
                .is_some_and(|sublist| sublist.starts_with_text("WHERE"))
        })
        .map_or(group.children.len(), |offset| set + 1 + offset);

    trace!(removed = end - set - 1, "erasing UPDATE assignments");
    group
        .children
        .splice(set + 1..end, [placeholder(ASSIGNMENTS_PLACEHOLDER)]);
    Ok(())
}

/// Collapse the parenthesis after each `IN` of a `WHERE` clause when it
/// only holds literals.
///
/// Consecutive `IN`s without a parenthesis in between share the next one.
fn collapse_in_lists(group: &mut Group) -> Result<(), Error> {
    if !group.starts_with_text("WHERE") {
        return Ok(());
    }
    let mut pending_in = None;
    for (at, child) in group.children.iter_mut().enumerate() {
        if let Node::Group(sublist) = child {
            if sublist.kind == GroupKind::Parenthesis {
                if pending_in.take().is_some() {
                    collapse_literal_list(sublist);
                }
                continue;
            }
        }
        if pending_in.is_none() && child.text_eq("IN") {
            pending_in = Some(at);
        }
    }
    match pending_in {
        Some(in_index) => Err(Error::MissingInList { in_index }),
        None => Ok(()),
    }
}

fn collapse_literal_list(parenthesis: &mut Group) {
    let end = parenthesis.children.len().saturating_sub(1).max(1);
    let Some(inner) = parenthesis.children.get(1..end) else {
        return;
    };
    if inner
        .iter()
        .all(|child| child.kind().is_some_and(TokenKind::is_deletable))
    {
        trace!(values = inner.len(), "collapsing IN list");
        parenthesis
            .children
            .splice(1..end, [placeholder(LIST_PLACEHOLDER)]);
    }
}

/// Mask the savepoint name, returning whether the group was a savepoint
/// statement.
fn erase_savepoint_name(group: &mut Group) -> Result<bool, Error> {
    let children = &group.children;
    let name_index = if group.starts_with_text("SAVEPOINT") {
        2
    } else if children.len() >= 3 && children[2].text_eq("SAVEPOINT") {
        4
    } else if children.len() >= 7
        && ROLLBACK_TO_SAVEPOINT
            .iter()
            .zip(children)
            .all(|(expected, child)| child.text_eq(expected))
    {
        6
    } else {
        return Ok(false);
    };

    let name = group
        .children
        .get_mut(name_index)
        .and_then(Node::as_group_mut)
        .and_then(|identifier| identifier.children.first_mut())
        .and_then(Node::as_token_mut)
        .ok_or(Error::MalformedSavepoint { name_index })?;
    trace!(name = %name.value, "erasing savepoint name");
    name.value = SAVEPOINT_PLACEHOLDER.into();
    Ok(true)
}

fn erase_cursor_name(group: &mut Group) {
    let Some(Node::Token(token)) = group.children.first_mut() else {
        return;
    };
    if token.value.starts_with(CURSOR_PREFIX) {
        trace!(name = %token.value, "erasing cursor name");
        token.value = CURSOR_PLACEHOLDER.into();
    }
}
