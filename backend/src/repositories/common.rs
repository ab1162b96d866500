//! Shared repository utilities.

use chrono::NaiveDate;
use sqlx::{Postgres, QueryBuilder};

/// Appends WHERE or AND to the query builder depending on whether a clause has already been added.
pub fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}

/// Adds an inclusive interval-overlap filter for `[from_col, to_col]` against `[from, to]`.
pub fn push_overlap<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    has_clause: &mut bool,
    from_col: &str,
    to_col: &str,
    from: NaiveDate,
    to: NaiveDate,
) {
    push_clause(builder, has_clause);
    builder.push(from_col).push(" <= ").push_bind(to);
    builder.push(" AND ").push(to_col).push(" >= ").push_bind(from);
}

/// Escapes LIKE wildcards so user search text matches literally.
pub fn like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
