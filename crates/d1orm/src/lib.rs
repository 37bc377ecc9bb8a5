//! # d1orm
//!
//! A fluent query builder and client for Cloudflare D1.
//!
//! ## Features
//!
//! - **One builder per statement**: chained calls consume and return the builder, so
//!   concurrent callers never share query state
//! - **Bound values**: every WHERE / IN / INSERT / UPDATE value travels as a `?`
//!   parameter next to the SQL, never as an interpolated literal
//! - **Explicit outcomes**: rows, success-without-rows, and failure are distinct
//!   (`Ok(QueryOutcome::Rows)`, `Ok(QueryOutcome::Done)`, `Err(OrmError)`)
//! - **Hooks**: inspect, log, or abort statements around each request
//!
//! ## Example
//!
//! ```ignore
//! use d1orm::{D1Client, D1Config, QueryOutcome, TracingSqlHook};
//!
//! let client = D1Client::new(D1Config::from_env()?)?.with_hook(TracingSqlHook::new());
//!
//! // SELECT
//! let adults = d1orm::table("users")
//!     .select(&["id", "name"])
//!     .and_where("age", ">", 18)
//!     .order_by("name", "ASC")
//!     .limit(20)
//!     .get(&client)
//!     .await?;
//!
//! // INSERT
//! d1orm::table("users").insert([("name", "Alice")], &client).await?;
//!
//! // UPDATE / DELETE
//! d1orm::table("users")
//!     .update([("name", "Alicia")])
//!     .and_where("id", "=", 1)
//!     .get(&client)
//!     .await?;
//! d1orm::table("users").delete().and_where("id", "=", 1).get(&client).await?;
//! ```

pub mod client;
pub mod config;
pub mod ddl;
pub mod error;
pub mod ident;
pub mod monitor;
pub mod prelude;
pub mod qb;
pub mod response;
pub mod row;
pub mod statement;

pub use client::{D1Client, GenericClient, HttpTransport, RawResponse, Transport};
pub use config::D1Config;
pub use ddl::Ddl;
pub use error::{OrmError, OrmResult};
pub use monitor::{HookAction, QueryContext, QueryHook, QueryResult, QueryType, TracingSqlHook};
pub use qb::{Direction, QueryBuilder, table};
pub use response::{Meta, QueryOutcome};
pub use row::Row;
pub use statement::Statement;

/// Bound parameter and column value type.
pub use serde_json::Value;
