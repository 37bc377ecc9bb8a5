//! Hooks into statement execution.
//!
//! `D1Client` calls every registered [`QueryHook`] around each request:
//! - `before_query` may abort the statement before anything is sent
//! - `after_query` sees the timing and a summary of every outcome
//! - `on_failure` receives the joined error messages whenever D1 reports `success: false`
//!
//! [`TracingSqlHook`] logs statements through `tracing`.

use crate::error::OrmError;
use crate::response::QueryOutcome;
use std::fmt;
use std::time::Duration;
use tracing::Level;

/// The kind of SQL statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    /// CREATE / DROP / ALTER
    Ddl,
    Other,
}

impl QueryType {
    /// Detect the statement kind from its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let keyword: String = sql
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();
        match keyword.as_str() {
            "SELECT" | "WITH" => QueryType::Select,
            "INSERT" | "REPLACE" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            "CREATE" | "DROP" | "ALTER" => QueryType::Ddl,
            _ => QueryType::Other,
        }
    }
}

/// What a hook knows about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub sql: String,
    pub param_count: usize,
    pub query_type: QueryType,
}

impl QueryContext {
    pub fn new(sql: &str, param_count: usize) -> Self {
        Self {
            sql: sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(sql),
        }
    }
}

/// Summary of an execution handed to [`QueryHook::after_query`].
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Rows returned.
    Rows(usize),
    /// Succeeded without rows; carries D1's `changes` count when reported.
    Done(Option<u64>),
    /// Failed; the error rendered as text.
    Error(String),
}

impl QueryResult {
    pub(crate) fn from_outcome(outcome: &Result<QueryOutcome, OrmError>) -> Self {
        match outcome {
            Ok(QueryOutcome::Rows(rows)) => QueryResult::Rows(rows.len()),
            Ok(QueryOutcome::Done(meta)) => QueryResult::Done(meta.changes),
            Err(e) => QueryResult::Error(e.to_string()),
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Done(Some(n)) => write!(f, "ok, {n} changed"),
            QueryResult::Done(None) => write!(f, "ok"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Action to take after `before_query`.
#[derive(Debug, Clone, PartialEq)]
pub enum HookAction {
    Continue,
    /// Do not send the statement; the terminal call fails with [`OrmError::Aborted`]
    /// carrying this reason, distinct from a validation error.
    Abort(String),
}

/// Trait for hooking into statement execution.
pub trait QueryHook: Send + Sync {
    /// Called before the request is sent; return `Abort` to veto it.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called once the request finished, successfully or not. Not called after an abort.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}

    /// D1 reported `success: false`; `message` holds every error message, newline separated.
    fn on_failure(&self, _ctx: &QueryContext, _message: &str) {}
}

/// A `tracing`-based hook that emits each statement before it is sent
/// and its outcome afterwards, under target `d1orm.sql`.
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Level for the statement and outcome events.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    /// Create a hook that logs at DEBUG and truncates SQL to 200 bytes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level used for statement and outcome events.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Truncate logged SQL to `len` bytes, cut at a char boundary and suffixed with `...`.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log SQL in full, however long.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql<'a>(&self, sql: &'a str) -> std::borrow::Cow<'a, str> {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_bytes(sql, max)).into(),
            _ => sql.into(),
        }
    }
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let sql = self.truncate_sql(&ctx.sql);
        emit_at_level!(
            self.level,
            target: "d1orm.sql",
            query_type = ?ctx.query_type,
            param_count = ctx.param_count,
            sql = %sql,
        );
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        emit_at_level!(
            self.level,
            target: "d1orm.sql",
            query_type = ?ctx.query_type,
            elapsed_ms,
            result = %result,
        );
    }
}

pub(crate) fn truncate_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Meta;

    #[test]
    fn detects_query_type() {
        assert_eq!(QueryType::from_sql("SELECT * FROM t"), QueryType::Select);
        assert_eq!(QueryType::from_sql("  select 1"), QueryType::Select);
        assert_eq!(QueryType::from_sql("INSERT INTO t (a) VALUES (?)"), QueryType::Insert);
        assert_eq!(QueryType::from_sql("UPDATE t SET a = ?"), QueryType::Update);
        assert_eq!(QueryType::from_sql("DELETE FROM t"), QueryType::Delete);
        assert_eq!(QueryType::from_sql("CREATE TABLE t (id INTEGER)"), QueryType::Ddl);
        assert_eq!(QueryType::from_sql("ALTER TABLE t ADD c TEXT"), QueryType::Ddl);
        assert_eq!(QueryType::from_sql("PRAGMA table_list"), QueryType::Other);
    }

    #[test]
    fn result_summary() {
        let rows = QueryResult::from_outcome(&Ok(QueryOutcome::Rows(vec![Default::default()])));
        assert_eq!(rows, QueryResult::Rows(1));
        assert_eq!(rows.to_string(), "1 rows");

        let meta = Meta {
            changes: Some(3),
            ..Default::default()
        };
        let done = QueryResult::from_outcome(&Ok(QueryOutcome::Done(meta)));
        assert_eq!(done.to_string(), "ok, 3 changed");

        let err = QueryResult::from_outcome(&Err(OrmError::validation("bad")));
        assert!(matches!(err, QueryResult::Error(ref m) if m.contains("bad")));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_bytes("héllo", 2), "h");
        assert_eq!(truncate_bytes("abc", 10), "abc");

        let hook = TracingSqlHook::new().max_sql_length(6);
        assert_eq!(hook.truncate_sql("SELECT * FROM t"), "SELECT...");
        assert_eq!(TracingSqlHook::new().no_truncate().truncate_sql("SELECT 1"), "SELECT 1");
    }

    #[test]
    fn tracing_hook_builder() {
        let hook = TracingSqlHook::new();
        assert_eq!(hook.level, Level::DEBUG);
        assert_eq!(hook.max_sql_length, Some(200));

        let hook = hook.level(Level::INFO).no_truncate();
        assert_eq!(hook.level, Level::INFO);
        assert_eq!(hook.max_sql_length, None);
    }
}
