//! D1 response envelope and outcome classification.

use crate::error::{OrmError, OrmResult};
use crate::row::Row;
use serde::{Deserialize, Serialize};

/// Longest response body kept in an [`OrmError::Http`] message.
const MAX_ERROR_BODY: usize = 512;

/// The Cloudflare API envelope returned by the D1 query endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    pub success: Option<bool>,
    pub errors: Option<Vec<ApiMessage>>,
    pub messages: Option<Vec<ApiMessage>>,
    pub result: Option<Vec<ResultSet>>,
}

/// An entry of the envelope's `errors` / `messages` arrays.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiMessage {
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

/// One statement's result inside the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResultSet {
    pub results: Option<Vec<Row>>,
    pub success: Option<bool>,
    #[serde(default)]
    pub meta: Meta,
}

/// Execution metadata reported by D1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub changes: Option<u64>,
    pub last_row_id: Option<i64>,
    pub rows_read: Option<u64>,
    pub rows_written: Option<u64>,
    /// Server-side execution time in milliseconds.
    pub duration: Option<f64>,
    pub changed_db: Option<bool>,
}

/// Outcome of a successful execution.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The statement produced at least one row.
    Rows(Vec<Row>),
    /// The statement ran and produced no rows (DML, DDL or an empty SELECT).
    Done(Meta),
}

impl QueryOutcome {
    pub fn is_rows(&self) -> bool {
        matches!(self, QueryOutcome::Rows(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, QueryOutcome::Done(_))
    }

    /// Borrow the rows; empty for `Done`.
    pub fn rows(&self) -> &[Row] {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Done(_) => &[],
        }
    }

    /// Take the rows; empty for `Done`.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Done(_) => Vec::new(),
        }
    }

    /// Take the first row, if any.
    pub fn into_first(self) -> Option<Row> {
        self.into_rows().into_iter().next()
    }

    /// Execution metadata; only reported for `Done`.
    pub fn meta(&self) -> Option<&Meta> {
        match self {
            QueryOutcome::Done(meta) => Some(meta),
            QueryOutcome::Rows(_) => None,
        }
    }
}

/// Turn an HTTP status and body into an outcome.
///
/// - envelope with `success: false` -> [`OrmError::Api`] carrying every error message
/// - first result set non-empty -> [`QueryOutcome::Rows`]
/// - first result set present but empty -> [`QueryOutcome::Done`]
/// - anything else -> [`OrmError::Http`] (non-2xx) or [`OrmError::UnexpectedResponse`]
pub fn classify(status: u16, body: &str) -> OrmResult<QueryOutcome> {
    let ok_status = (200..300).contains(&status);

    let response: QueryResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) if ok_status => {
            return Err(OrmError::UnexpectedResponse(format!("invalid JSON body: {e}")));
        }
        Err(_) => return Err(http_error(status, body)),
    };

    if response.success == Some(false) {
        return Err(OrmError::Api {
            messages: join_messages(response.errors.as_deref().unwrap_or_default()),
        });
    }

    let first = response.result.and_then(|sets| sets.into_iter().next());
    match first {
        Some(ResultSet {
            results: Some(rows),
            meta,
            ..
        }) => {
            if rows.is_empty() {
                Ok(QueryOutcome::Done(meta))
            } else {
                Ok(QueryOutcome::Rows(rows))
            }
        }
        _ if !ok_status => Err(http_error(status, body)),
        _ => Err(OrmError::UnexpectedResponse(
            "response carries no result set".to_string(),
        )),
    }
}

fn join_messages(errors: &[ApiMessage]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .map(|e| e.message.as_str())
        .filter(|m| !m.is_empty())
        .collect();
    if messages.is_empty() {
        "unknown error".to_string()
    } else {
        messages.join("\n")
    }
}

fn http_error(status: u16, body: &str) -> OrmError {
    let mut end = body.len().min(MAX_ERROR_BODY);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    OrmError::Http {
        status,
        body: body[..end].to_string(),
    }
}
