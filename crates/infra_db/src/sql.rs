//! Rendering of finder queries to PostgreSQL
//!
//! A [`Query`] becomes a `SELECT` or `SELECT COUNT(*)` whose WHERE clause is
//! produced from [`Query::predicate`], so a list and its count twin always
//! carry the same condition. Every value is a bind parameter; column and
//! table names come from `&'static str` constants only.

use sqlx::{Postgres, QueryBuilder};

use core_kernel::query::ID_COLUMN;
use core_kernel::{Predicate, Query, SortDirection, Value};

/// Escapes `LIKE` wildcards so a search term matches literally
///
/// The rendered pattern uses `\` as the escape character.
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `SELECT columns FROM table WHERE ... ORDER BY ... LIMIT ... OFFSET ...`
pub fn select<'args>(table: &str, columns: &str, query: &Query) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {} FROM {} WHERE ", columns, table));
    push_predicate(&mut builder, table, &query.predicate());

    builder.push(" ORDER BY ");
    if let Some(sort) = query.sort() {
        builder.push(sort.column);
        builder.push(match sort.direction {
            SortDirection::Asc => " ASC, ",
            SortDirection::Desc => " DESC, ",
        });
    }
    builder.push(ID_COLUMN);
    builder.push(" ASC");

    if let Some(window) = query.window() {
        builder.push(" LIMIT ");
        builder.push_bind(to_i64(window.limit));
        builder.push(" OFFSET ");
        builder.push_bind(to_i64(window.offset));
    }
    builder
}

/// `SELECT COUNT(*) FROM table WHERE ...`, ignoring sort and window
pub fn count<'args>(table: &str, query: &Query) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT COUNT(*) FROM {} WHERE ", table));
    push_predicate(&mut builder, table, &query.predicate());
    builder
}

/// Appends a predicate; compound nodes are always parenthesised
pub fn push_predicate<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    table: &str,
    predicate: &Predicate,
) {
    match predicate {
        Predicate::Always => {
            builder.push("TRUE");
        }
        Predicate::Eq(column, Value::Null) | Predicate::IsNull(column) => {
            builder.push(*column).push(" IS NULL");
        }
        Predicate::Eq(column, value) => {
            builder.push(*column).push(" = ");
            push_value(builder, value);
        }
        Predicate::EqIgnoreCase(column, term) => {
            builder.push(format!("LOWER({}) = LOWER(", column));
            builder.push_bind(term.clone());
            builder.push(")");
        }
        Predicate::Contains(column, term) => {
            builder.push(format!("LOWER({}) LIKE ", column));
            builder.push_bind(format!("%{}%", escape_like(&term.to_lowercase())));
            builder.push(" ESCAPE '\\'");
        }
        Predicate::Between(column, low, high) => {
            builder.push(*column).push(" BETWEEN ");
            push_value(builder, low);
            builder.push(" AND ");
            push_value(builder, high);
        }
        Predicate::Compare(column, op, value) => {
            builder.push(format!("{} {} ", column, op.as_sql()));
            push_value(builder, value);
        }
        Predicate::MemberOf { relation, id } => {
            builder.push(format!(
                "EXISTS (SELECT 1 FROM {join} WHERE {join}.{owner} = {table}.{key} AND {join}.{member} = ",
                join = relation.join_table,
                owner = relation.owner_column,
                member = relation.member_column,
                table = table,
                key = ID_COLUMN,
            ));
            builder.push_bind(*id);
            builder.push(")");
        }
        Predicate::All(predicates) => push_group(builder, table, predicates, " AND ", "TRUE"),
        Predicate::Any(predicates) => push_group(builder, table, predicates, " OR ", "FALSE"),
    }
}

fn push_group<'args>(
    builder: &mut QueryBuilder<'args, Postgres>,
    table: &str,
    predicates: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if predicates.is_empty() {
        builder.push(empty);
        return;
    }
    builder.push("(");
    for (i, predicate) in predicates.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, table, predicate);
    }
    builder.push(")");
}

fn push_value<'args>(builder: &mut QueryBuilder<'args, Postgres>, value: &Value) {
    match value {
        Value::Null => {
            builder.push("NULL");
        }
        Value::Bool(v) => {
            builder.push_bind(*v);
        }
        Value::Int(v) => {
            builder.push_bind(*v);
        }
        Value::Text(v) => {
            builder.push_bind(v.clone());
        }
        Value::Date(v) => {
            builder.push_bind(*v);
        }
        Value::Timestamp(v) => {
            builder.push_bind(*v);
        }
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
