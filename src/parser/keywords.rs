//! Keyword classification.

use crate::tokens::TokenKind;

/// Classify an upper-cased word, returning `None` for plain names.
pub(super) fn classify(upper: &str) -> Option<TokenKind> {
    let kind = match upper {
        "SELECT" | "INSERT" | "UPDATE" | "DELETE" | "REPLACE" | "MERGE" => TokenKind::Dml,
        "CREATE" | "ALTER" | "DROP" | "TRUNCATE" => TokenKind::Ddl,
        "WITH" => TokenKind::Cte,
        "ABORT" | "ADD" | "AFTER" | "ALL" | "AND" | "ANY" | "AS" | "ASC" | "BEFORE"
        | "BEGIN" | "BETWEEN" | "BY" | "CASCADE" | "CASE" | "CAST" | "CHECK" | "CLOSE"
        | "COLLATE" | "COMMIT" | "CONFLICT" | "CONSTRAINT" | "CROSS" | "CURRENT" | "CURSOR"
        | "DEALLOCATE" | "DECLARE" | "DEFAULT" | "DEFERRABLE" | "DEFERRED" | "DESC"
        | "DISTINCT" | "DO" | "EACH" | "ELSE" | "END" | "ESCAPE" | "EXCEPT" | "EXCLUSIVE"
        | "EXECUTE" | "EXISTS" | "EXPLAIN" | "FALSE" | "FETCH" | "FOR" | "FOREIGN" | "FROM"
        | "FULL" | "GLOB" | "GRANT" | "GROUP" | "HAVING" | "HOLD" | "IF" | "ILIKE"
        | "IMMEDIATE" | "IN" | "INDEX" | "INNER" | "INTERSECT" | "INTO" | "IS" | "ISNULL"
        | "JOIN" | "LEFT" | "LIKE" | "LIMIT" | "LOCK" | "NATURAL" | "NO" | "NOT" | "NOTNULL"
        | "NOWAIT" | "NULL" | "NULLS" | "OF" | "OFFSET" | "ON" | "ONLY" | "OR" | "ORDER"
        | "OUTER" | "OVER" | "PARTITION" | "PREPARE" | "PRIMARY" | "RECURSIVE"
        | "REFERENCES" | "REGEXP" | "RELEASE" | "RESTRICT" | "RETURNING" | "REVOKE"
        | "RIGHT" | "ROLLBACK" | "SAVEPOINT" | "SCROLL" | "SET" | "SHOW" | "TABLE"
        | "TEMPORARY" | "THEN" | "TO" | "TRANSACTION" | "TRIGGER" | "TRUE" | "UNION"
        | "UNIQUE" | "UNLOGGED" | "USING" | "VACUUM" | "VALUES" | "VIEW" | "WHEN" | "WHERE"
        | "WINDOW" | "WITHOUT" | "WORK" => TokenKind::Keyword,
        _ => return None,
    };
    Some(kind)
}

/// Keywords that may be followed by further words to form one keyword token.
///
/// Each entry lists the leading word and the accepted continuations, tried
/// in order; the longest continuation wins.
pub(super) const COMPOUND_KEYWORDS: &[(&str, &[&[&str]])] = &[
    ("ORDER", &[&["BY"]]),
    ("GROUP", &[&["BY"]]),
    ("UNION", &[&["ALL"]]),
    ("NULLS", &[&["FIRST"], &["LAST"]]),
    (
        "LEFT",
        &[&["OUTER", "JOIN"], &["INNER", "JOIN"], &["JOIN"]],
    ),
    (
        "RIGHT",
        &[&["OUTER", "JOIN"], &["INNER", "JOIN"], &["JOIN"]],
    ),
    (
        "FULL",
        &[&["OUTER", "JOIN"], &["INNER", "JOIN"], &["JOIN"]],
    ),
    ("INNER", &[&["JOIN"]]),
    ("OUTER", &[&["JOIN"]]),
    ("CROSS", &[&["JOIN"]]),
    (
        "NATURAL",
        &[
            &["LEFT", "OUTER", "JOIN"],
            &["RIGHT", "OUTER", "JOIN"],
            &["FULL", "OUTER", "JOIN"],
            &["LEFT", "JOIN"],
            &["RIGHT", "JOIN"],
            &["FULL", "JOIN"],
            &["INNER", "JOIN"],
            &["JOIN"],
        ],
    ),
];
