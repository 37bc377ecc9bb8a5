//! Statement heads and appended clauses.

use crate::statement::Statement;
use serde_json::Value;

/// The leading part of the statement, replaced wholesale by `update()` / `delete()`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Head {
    /// `SELECT <columns> FROM <table>`; empty columns render as `*`.
    Select { columns: Vec<String> },
    /// `UPDATE <table> SET a = ?, b = ?`
    Update { assignments: Vec<(String, Value)> },
    /// `DELETE FROM <table>`
    Delete,
}

impl Head {
    pub(crate) fn write(&self, table: &str, out: &mut Statement) {
        match self {
            Head::Select { columns } => {
                out.push("SELECT ");
                if columns.is_empty() {
                    out.push("*");
                } else {
                    out.push(&columns.join(", "));
                }
                out.push(" FROM ").push(table);
            }
            Head::Update { assignments } => {
                out.push("UPDATE ").push(table).push(" SET ");
                for (i, (column, value)) in assignments.iter().enumerate() {
                    if i > 0 {
                        out.push(", ");
                    }
                    out.push(column).push(" = ").push_bind(value.clone());
                }
            }
            Head::Delete => {
                out.push("DELETE FROM ").push(table);
            }
        }
    }
}

/// How a where-family call joins onto what came before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Conjunction {
    And,
    Or,
}

/// Sort direction for `ORDER BY`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Exactly `"ASC"` or `"DESC"`; anything else falls back to ascending.
    pub fn parse(direction: &str) -> Self {
        match direction {
            "DESC" => Direction::Desc,
            _ => Direction::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A filter condition; values are always bound.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Condition {
    Compare {
        column: String,
        op: &'static str,
        value: Value,
    },
    In {
        column: String,
        values: Vec<Value>,
    },
}

impl Condition {
    fn write(&self, out: &mut Statement) {
        match self {
            Condition::Compare { column, op, value } => {
                out.push(column).push(" ").push(op).push(" ").push_bind(value.clone());
            }
            // SQLite accepts `IN ()`, but `1=0` reads unambiguously everywhere.
            Condition::In { values, .. } if values.is_empty() => {
                out.push("1=0");
            }
            Condition::In { column, values } => {
                out.push(column).push(" IN (");
                out.push_bind_list(values.iter().cloned());
                out.push(")");
            }
        }
    }
}

/// A fragment appended after the head, rendered in call order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Clause {
    Raw(String),
    Join {
        table: String,
        left: String,
        op: &'static str,
        right: String,
    },
    Union(Statement),
    Where {
        /// `WHERE`, `AND` or `OR`, fixed when the call was made.
        keyword: &'static str,
        condition: Condition,
    },
    OrderBy {
        column: String,
        direction: Direction,
    },
    GroupBy(String),
    Limit(i64),
    Offset(i64),
}

impl Clause {
    pub(crate) fn write(&self, out: &mut Statement) {
        out.push(" ");
        match self {
            Clause::Raw(sql) => {
                out.push(sql);
            }
            Clause::Join {
                table,
                left,
                op,
                right,
            } => {
                out.push("JOIN ")
                    .push(table)
                    .push(" ON ")
                    .push(left)
                    .push(" ")
                    .push(op)
                    .push(" ")
                    .push(right);
            }
            Clause::Union(sub) => {
                out.push("UNION (").push_statement(sub).push(")");
            }
            Clause::Where { keyword, condition } => {
                out.push(keyword).push(" ");
                condition.write(out);
            }
            Clause::OrderBy { column, direction } => {
                out.push("ORDER BY ")
                    .push(column)
                    .push(" ")
                    .push(direction.as_str());
            }
            Clause::GroupBy(column) => {
                out.push("GROUP BY ").push(column);
            }
            Clause::Limit(n) => {
                out.push(&format!("LIMIT {n}"));
            }
            Clause::Offset(n) => {
                out.push(&format!("OFFSET {n}"));
            }
        }
    }
}

/// SQLite binary comparison operators accepted by where/join calls, upper-cased.
const OPERATORS: &[&str] = &[
    "=", "==", "!=", "<>", "<", "<=", ">", ">=", "LIKE", "NOT LIKE", "GLOB", "NOT GLOB", "IS",
    "IS NOT",
];

/// Map a caller-supplied operator onto the accepted set (case-insensitive, inner
/// whitespace collapsed). `None` when the operator is not a known comparison.
pub(crate) fn normalize_operator(op: &str) -> Option<&'static str> {
    let normalized = op
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    OPERATORS.iter().copied().find(|known| *known == normalized)
}

/// Whether a raw fragment introduces a WHERE clause (whole word, any case).
pub(crate) fn contains_where_keyword(sql: &str) -> bool {
    sql.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|word| word.eq_ignore_ascii_case("WHERE"))
}
