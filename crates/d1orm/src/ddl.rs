//! One-shot schema statements.
//!
//! These bypass the query builder entirely: each [`Ddl`] value renders exactly one
//! statement and is executed on its own.
//!
//! ```ignore
//! Ddl::create_table("users", &["id INTEGER PRIMARY KEY", "name TEXT NOT NULL"])
//!     .execute(&client)
//!     .await?;
//! Ddl::add_column("users", "email TEXT").execute(&client).await?;
//! ```

use crate::client::GenericClient;
use crate::error::{OrmError, OrmResult};
use crate::ident::{IdentKind, check_ident};
use crate::response::QueryOutcome;
use crate::statement::Statement;

/// A schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ddl {
    /// `CREATE TABLE <table> (<columns>)`
    CreateTable { table: String, columns: Vec<String> },
    /// `DROP TABLE <table>`
    DropTable { table: String },
    /// `ALTER TABLE <table> ADD <definition>`
    AddColumn { table: String, definition: String },
    /// `ALTER TABLE <table> RENAME COLUMN <from> TO <to>`
    RenameColumn {
        table: String,
        from: String,
        to: String,
    },
    /// `ALTER TABLE <table> DROP COLUMN <column>`
    DropColumn { table: String, column: String },
}

impl Ddl {
    /// `columns` are full column definitions, e.g. `"name TEXT NOT NULL"`.
    pub fn create_table(table: &str, columns: &[&str]) -> Self {
        Ddl::CreateTable {
            table: table.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn drop_table(table: &str) -> Self {
        Ddl::DropTable {
            table: table.to_string(),
        }
    }

    pub fn add_column(table: &str, definition: &str) -> Self {
        Ddl::AddColumn {
            table: table.to_string(),
            definition: definition.to_string(),
        }
    }

    /// Rename a column. SQLite cannot change a column's type in place, so this is
    /// the only column rewrite D1 supports.
    pub fn update_column(table: &str, from: &str, to: &str) -> Self {
        Ddl::RenameColumn {
            table: table.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn drop_column(table: &str, column: &str) -> Self {
        Ddl::DropColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }

    fn table(&self) -> &str {
        match self {
            Ddl::CreateTable { table, .. }
            | Ddl::DropTable { table }
            | Ddl::AddColumn { table, .. }
            | Ddl::RenameColumn { table, .. }
            | Ddl::DropColumn { table, .. } => table,
        }
    }

    /// Check names and render the statement.
    pub fn to_statement(&self) -> OrmResult<Statement> {
        check_ident(self.table(), IdentKind::Table)?;
        let sql = match self {
            Ddl::CreateTable { table, columns } => {
                if columns.iter().all(|c| c.trim().is_empty()) {
                    return Err(OrmError::validation(format!(
                        "CREATE TABLE {table} needs at least one column"
                    )));
                }
                format!("CREATE TABLE {} ({})", table, columns.join(", "))
            }
            Ddl::DropTable { table } => format!("DROP TABLE {table}"),
            Ddl::AddColumn { table, definition } => {
                if definition.trim().is_empty() {
                    return Err(OrmError::validation("column definition is empty"));
                }
                format!("ALTER TABLE {table} ADD {definition}")
            }
            Ddl::RenameColumn { table, from, to } => {
                check_ident(from, IdentKind::Column)?;
                check_ident(to, IdentKind::Column)?;
                format!("ALTER TABLE {table} RENAME COLUMN {from} TO {to}")
            }
            Ddl::DropColumn { table, column } => {
                check_ident(column, IdentKind::Column)?;
                format!("ALTER TABLE {table} DROP COLUMN {column}")
            }
        };
        Ok(Statement::new(sql))
    }

    /// Get the built SQL string (for debugging); empty when the names are invalid.
    pub fn to_sql(&self) -> String {
        self.to_statement().map(|s| s.sql).unwrap_or_default()
    }

    /// Execute the statement.
    pub async fn execute(&self, conn: &impl GenericClient) -> OrmResult<QueryOutcome> {
        let statement = self.to_statement()?;
        conn.execute(&statement).await
    }
}
