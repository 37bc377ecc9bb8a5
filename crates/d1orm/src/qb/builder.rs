//! The per-statement query builder.

use crate::client::GenericClient;
use crate::error::{OrmError, OrmResult};
use crate::ident::{IdentKind, check_ident};
use crate::qb::clause::{
    Clause, Condition, Conjunction, Direction, Head, contains_where_keyword, normalize_operator,
};
use crate::response::QueryOutcome;
use crate::row::Row;
use crate::statement::Statement;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Substituted by `limit()` when the requested count is not positive.
pub const DEFAULT_LIMIT: i64 = 1000;

/// Fluent builder for one SQL statement against one table.
///
/// Every chained call consumes and returns the builder, so each statement owns its
/// state. Terminal calls (`get`, `first`, `fetch_*`, `insert*`) borrow it and can be
/// repeated; each repetition sends the same statement again.
///
/// Invalid input (bad identifiers, unknown operators, empty or non-object payloads)
/// is recorded on the builder and reported as [`OrmError::Validation`] by the terminal
/// call, before any request is sent.
#[derive(Clone, Debug)]
pub struct QueryBuilder {
    table: String,
    head: Head,
    clauses: Vec<Clause>,
    has_where: bool,
    build_error: Option<String>,
}

impl QueryBuilder {
    /// Start `SELECT * FROM <table>`.
    pub fn new(table: &str) -> Self {
        let mut qb = Self {
            table: table.to_string(),
            head: Head::Select {
                columns: Vec::new(),
            },
            clauses: Vec::new(),
            has_where: false,
            build_error: None,
        };
        if let Err(e) = check_ident(table, IdentKind::Table) {
            qb.record(e);
        }
        qb
    }

    /// The table this builder targets.
    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn record(&mut self, err: OrmError) {
        if self.build_error.is_none() {
            self.build_error = Some(match err {
                OrmError::Validation(message) => message,
                other => other.to_string(),
            });
        }
    }

    // ==================== SELECT columns ====================

    /// Replace `*` with the given columns or expressions. An empty slice keeps `*`.
    ///
    /// Only affects a SELECT; after `update()` / `delete()` this is a no-op.
    pub fn select(mut self, columns: &[&str]) -> Self {
        if let Head::Select { columns: current } = &mut self.head {
            *current = columns.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// Reset the column list to `*`.
    pub fn select_all(self) -> Self {
        self.select(&[])
    }

    // ==================== Free-form fragments ====================

    /// Append a raw SQL fragment (escape hatch for unsupported clauses).
    ///
    /// A fragment containing the word `WHERE` counts as an existing WHERE clause for
    /// later where-family calls. LIMIT/OFFSET written here are not tracked, so
    /// [`first`](Self::first) would add its own `LIMIT 1`; use [`limit`](Self::limit).
    pub fn raw(mut self, sql: &str) -> Self {
        if contains_where_keyword(sql) {
            self.has_where = true;
        }
        self.clauses.push(Clause::Raw(sql.to_string()));
        self
    }

    /// Append `JOIN <table> ON <left> <op> <right>`.
    pub fn join(mut self, table: &str, left: &str, op: &str, right: &str) -> Self {
        match normalize_operator(op) {
            Some(op) => self.clauses.push(Clause::Join {
                table: table.to_string(),
                left: left.to_string(),
                op,
                right: right.to_string(),
            }),
            None => self.record(OrmError::validation(format!(
                "unsupported join operator {op:?}"
            ))),
        }
        self
    }

    /// Append `UNION (<subquery>)`; the subquery's bound values come along.
    pub fn union(mut self, subquery: &QueryBuilder) -> Self {
        match subquery.to_statement() {
            Ok(sub) => self.clauses.push(Clause::Union(sub)),
            Err(e) => self.record(e),
        }
        self
    }

    /// Append `UNION (<sql>)` from hand-written SQL.
    pub fn union_raw(mut self, sql: impl Into<Statement>) -> Self {
        self.clauses.push(Clause::Union(sql.into()));
        self
    }

    // ==================== WHERE ====================

    /// `WHERE column op ?`, or `AND column op ?` once a WHERE exists.
    pub fn and_where(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.push_compare(Conjunction::And, column, op, value.into())
    }

    /// `WHERE column op ?`, or `OR column op ?` once a WHERE exists.
    pub fn or_where(self, column: &str, op: &str, value: impl Into<Value>) -> Self {
        self.push_compare(Conjunction::Or, column, op, value.into())
    }

    /// `WHERE column IN (?, ...)`, or `AND column IN (...)` once a WHERE exists.
    ///
    /// An empty list matches nothing (`1=0`).
    pub fn where_in<V: Into<Value>>(mut self, column: &str, values: impl IntoIterator<Item = V>) -> Self {
        if let Err(e) = check_ident(column, IdentKind::Column) {
            self.record(e);
            return self;
        }
        let condition = Condition::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        };
        self.push_condition(Conjunction::And, condition)
    }

    fn push_compare(mut self, conj: Conjunction, column: &str, op: &str, value: Value) -> Self {
        if let Err(e) = check_ident(column, IdentKind::Column) {
            self.record(e);
            return self;
        }
        let Some(op) = normalize_operator(op) else {
            self.record(OrmError::validation(format!(
                "unsupported comparison operator {op:?}"
            )));
            return self;
        };
        let condition = Condition::Compare {
            column: column.to_string(),
            op,
            value,
        };
        self.push_condition(conj, condition)
    }

    fn push_condition(mut self, conj: Conjunction, condition: Condition) -> Self {
        let keyword = match (self.has_where, conj) {
            (false, _) => "WHERE",
            (true, Conjunction::And) => "AND",
            (true, Conjunction::Or) => "OR",
        };
        self.has_where = true;
        self.clauses.push(Clause::Where { keyword, condition });
        self
    }

    // ==================== Ordering, grouping, paging ====================

    /// `ORDER BY column <dir>`; `direction` must be exactly `"ASC"` or `"DESC"`,
    /// anything else sorts ascending.
    pub fn order_by(mut self, column: &str, direction: &str) -> Self {
        self.clauses.push(Clause::OrderBy {
            column: column.to_string(),
            direction: Direction::parse(direction),
        });
        self
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, Direction::Asc.as_str())
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc.as_str())
    }

    /// `GROUP BY column`.
    pub fn group_by(mut self, column: &str) -> Self {
        self.clauses.push(Clause::GroupBy(column.to_string()));
        self
    }

    /// `LIMIT n`; a non-positive `n` becomes [`DEFAULT_LIMIT`].
    pub fn limit(mut self, n: i64) -> Self {
        let n = if n > 0 { n } else { DEFAULT_LIMIT };
        self.clauses.push(Clause::Limit(n));
        self
    }

    /// `OFFSET n`; a non-positive `n` becomes 0.
    pub fn offset(mut self, n: i64) -> Self {
        self.clauses.push(Clause::Offset(n.max(0)));
        self
    }

    // ==================== UPDATE / DELETE ====================

    /// Turn the statement into `UPDATE <table> SET k = ?, ...`.
    ///
    /// Discards previously appended clauses; chain `and_where` afterwards.
    /// An empty mapping is a validation error.
    pub fn update<I, K, V>(mut self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        match collect_pairs(data) {
            Ok(assignments) => self.reset(Head::Update { assignments }),
            Err(e) => {
                self.record(e);
                self
            }
        }
    }

    /// Like [`update`](Self::update), taking any value that serializes to a JSON object.
    pub fn update_json<S: Serialize + ?Sized>(mut self, data: &S) -> Self {
        match json_pairs(data) {
            Ok(assignments) => self.reset(Head::Update { assignments }),
            Err(e) => {
                self.record(e);
                self
            }
        }
    }

    /// Turn the statement into `DELETE FROM <table>`, discarding appended clauses.
    pub fn delete(self) -> Self {
        self.reset(Head::Delete)
    }

    fn reset(mut self, head: Head) -> Self {
        self.head = head;
        self.clauses.clear();
        self.has_where = false;
        self
    }

    // ==================== Build helpers ====================

    /// Check builder state before execution.
    pub fn validate(&self) -> OrmResult<()> {
        match &self.build_error {
            Some(err) => Err(OrmError::Validation(err.clone())),
            None => Ok(()),
        }
    }

    fn render(&self) -> Statement {
        let mut out = Statement::new(String::with_capacity(64));
        self.head.write(&self.table, &mut out);
        for clause in &self.clauses {
            clause.write(&mut out);
        }
        out
    }

    /// Render the statement, failing on any recorded validation error.
    pub fn to_statement(&self) -> OrmResult<Statement> {
        self.validate()?;
        Ok(self.render())
    }

    /// Get the built SQL string (for debugging).
    pub fn to_sql(&self) -> String {
        self.render().sql
    }

    /// The statement `first()` sends: the existing LIMIT is rewritten to 1;
    /// otherwise `LIMIT 1` goes in front of the first OFFSET, or at the end.
    ///
    /// Only clauses added with [`limit`](Self::limit) / [`offset`](Self::offset)
    /// are seen here; a LIMIT written through [`raw`](Self::raw) is left alone.
    pub fn first_statement(&self) -> OrmResult<Statement> {
        self.validate()?;
        let mut qb = self.clone();
        match qb.clauses.iter().rposition(|c| matches!(c, Clause::Limit(_))) {
            Some(i) => qb.clauses[i] = Clause::Limit(1),
            None => match qb.clauses.iter().position(|c| matches!(c, Clause::Offset(_))) {
                Some(i) => qb.clauses.insert(i, Clause::Limit(1)),
                None => qb.clauses.push(Clause::Limit(1)),
            },
        }
        Ok(qb.render())
    }

    /// The statement `insert()` sends: `INSERT INTO <table> (k, ...) VALUES (?, ...)`.
    ///
    /// Independent of any chained clauses; only the table name is used.
    pub fn insert_statement<I, K, V>(&self, data: I) -> OrmResult<Statement>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.build_insert(collect_pairs(data)?)
    }

    fn build_insert(&self, pairs: Vec<(String, Value)>) -> OrmResult<Statement> {
        check_ident(&self.table, IdentKind::Table)?;
        let (columns, values): (Vec<String>, Vec<Value>) = pairs.into_iter().unzip();
        let mut out = Statement::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            self.table,
            columns.join(", ")
        ));
        out.push_bind_list(values).push(")");
        Ok(out)
    }

    // ==================== Execution ====================

    /// Execute the statement.
    pub async fn get(&self, conn: &impl GenericClient) -> OrmResult<QueryOutcome> {
        let statement = self.to_statement()?;
        conn.execute(&statement).await
    }

    /// Execute and decode every row into `T`; no rows gives an empty vec.
    pub async fn fetch_all<T: DeserializeOwned>(&self, conn: &impl GenericClient) -> OrmResult<Vec<T>> {
        let outcome = self.get(conn).await?;
        outcome.rows().iter().map(Row::decode).collect()
    }

    /// Execute with `LIMIT 1` and return the first row, if any.
    pub async fn first(&self, conn: &impl GenericClient) -> OrmResult<Option<Row>> {
        let statement = self.first_statement()?;
        Ok(conn.execute(&statement).await?.into_first())
    }

    /// Execute with `LIMIT 1` and decode the first row, if any.
    pub async fn fetch_opt<T: DeserializeOwned>(&self, conn: &impl GenericClient) -> OrmResult<Option<T>> {
        self.first(conn).await?.as_ref().map(Row::decode).transpose()
    }

    /// Insert one row built from `(column, value)` pairs. Terminal.
    ///
    /// ```ignore
    /// d1orm::table("users")
    ///     .insert([("name", "Alice"), ("email", "alice@example.com")], &client)
    ///     .await?;
    /// ```
    pub async fn insert<I, K, V>(&self, data: I, conn: &impl GenericClient) -> OrmResult<QueryOutcome>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let statement = self.insert_statement(data)?;
        conn.execute(&statement).await
    }

    /// Insert one row from any value that serializes to a JSON object. Terminal.
    ///
    /// Anything else (a string, an array, ...) fails before a request is sent.
    pub async fn insert_json<S: Serialize + ?Sized>(
        &self,
        data: &S,
        conn: &impl GenericClient,
    ) -> OrmResult<QueryOutcome> {
        let statement = self.build_insert(json_pairs(data)?)?;
        conn.execute(&statement).await
    }
}

/// Collect and check `(column, value)` pairs from a mapping.
fn collect_pairs<I, K, V>(data: I) -> OrmResult<Vec<(String, Value)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    let pairs: Vec<(String, Value)> = data
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    if pairs.is_empty() {
        return Err(OrmError::validation("data mapping is empty"));
    }
    for (column, _) in &pairs {
        check_ident(column, IdentKind::Column)?;
    }
    Ok(pairs)
}

/// Serialize `data` and require a non-empty JSON object.
fn json_pairs<S: Serialize + ?Sized>(data: &S) -> OrmResult<Vec<(String, Value)>> {
    match serde_json::to_value(data)? {
        Value::Object(map) => collect_pairs(map),
        other => Err(OrmError::validation(format!(
            "data must be a key/value mapping, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
