//! Convenient re-exports for application code.

pub use crate::client::{D1Client, GenericClient};
pub use crate::config::D1Config;
pub use crate::ddl::Ddl;
pub use crate::error::{OrmError, OrmResult};
pub use crate::qb::{QueryBuilder, table};
pub use crate::response::QueryOutcome;
pub use crate::row::Row;
