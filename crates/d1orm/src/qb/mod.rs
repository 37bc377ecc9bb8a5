//! Fluent query builder.
//!
//! Each statement is built by its own [`QueryBuilder`] value; values are bound as
//! `?` parameters, never spliced into the SQL text.
//!
//! ```ignore
//! use d1orm::qb;
//!
//! // SELECT
//! let rows = qb::table("users")
//!     .select(&["id", "name"])
//!     .and_where("age", ">", 18)
//!     .or_where("role", "=", "admin")
//!     .order_by("name", "ASC")
//!     .limit(20)
//!     .get(&client)
//!     .await?;
//!
//! // INSERT (terminal)
//! qb::table("users").insert([("name", "Alice")], &client).await?;
//!
//! // UPDATE
//! qb::table("users")
//!     .update([("status", "inactive")])
//!     .and_where("id", "=", 7)
//!     .get(&client)
//!     .await?;
//!
//! // DELETE
//! qb::table("users").delete().and_where("id", "=", 7).get(&client).await?;
//! ```

mod builder;
mod clause;

pub use builder::{DEFAULT_LIMIT, QueryBuilder};
pub use clause::Direction;

/// Start a `SELECT * FROM <table>` builder.
pub fn table(name: &str) -> QueryBuilder {
    QueryBuilder::new(name)
}

#[cfg(test)]
mod tests;
