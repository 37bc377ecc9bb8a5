//! D1 client: HTTP transport, hooks, and response classification.

use crate::config::D1Config;
use crate::error::{OrmError, OrmResult};
use crate::monitor::{HookAction, QueryContext, QueryHook, QueryResult, truncate_bytes};
use crate::response::{QueryOutcome, classify};
use crate::statement::Statement;
use reqwest::header::CONTENT_TYPE;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Status and body of a query endpoint response, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The seam that performs the HTTP POST.
///
/// [`HttpTransport`] is the production implementation; tests plug in scripted ones.
pub trait Transport: Send + Sync {
    /// POST `body` (a JSON document) to `url` with `Authorization: Bearer <token>`.
    fn post_query(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> impl Future<Output = OrmResult<RawResponse>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport; `timeout` bounds each whole request when set.
    pub fn new(timeout: Option<Duration>) -> OrmResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing `reqwest::Client` (shared connection settings, proxies, ...).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn post_query(
        &self,
        url: &str,
        token: &str,
        body: String,
    ) -> impl Future<Output = OrmResult<RawResponse>> + Send {
        let request = self
            .client
            .post(url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        async move {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(RawResponse { status, body })
        }
    }
}

/// Anything that can execute a [`Statement`]; query builders run against this.
pub trait GenericClient: Send + Sync {
    fn execute(&self, statement: &Statement) -> impl Future<Output = OrmResult<QueryOutcome>> + Send;
}

/// Client for one D1 database.
///
/// Cheap to clone; clones share the transport and hooks.
///
/// ```ignore
/// let client = D1Client::new(D1Config::from_env()?)?
///     .with_hook(TracingSqlHook::new());
///
/// let rows = d1orm::table("users")
///     .and_where("age", ">", 18)
///     .get(&client)
///     .await?;
/// ```
#[derive(Clone)]
pub struct D1Client<T = HttpTransport> {
    config: D1Config,
    url: String,
    transport: T,
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl D1Client<HttpTransport> {
    /// Create a client that talks to the Cloudflare API over HTTPS.
    pub fn new(config: D1Config) -> OrmResult<Self> {
        config.validate()?;
        let transport = HttpTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Shortcut for `D1Client::new(D1Config::from_env()?)`.
    pub fn from_env() -> OrmResult<Self> {
        Self::new(D1Config::from_env()?)
    }
}

impl<T: Transport> D1Client<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: D1Config, transport: T) -> Self {
        let url = config.query_url();
        Self {
            config,
            url,
            transport,
            hooks: Vec::new(),
        }
    }

    /// Register a hook; hooks run in registration order.
    pub fn with_hook(mut self, hook: impl QueryHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &D1Config {
        &self.config
    }

    /// The transport that sends requests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a hand-written SQL string with no bound parameters.
    pub async fn query(&self, sql: &str) -> OrmResult<QueryOutcome> {
        self.execute_statement(&Statement::new(sql)).await
    }

    /// Send one statement and classify the response.
    pub async fn execute_statement(&self, statement: &Statement) -> OrmResult<QueryOutcome> {
        let ctx = QueryContext::new(&statement.sql, statement.params.len());
        for hook in &self.hooks {
            if let HookAction::Abort(reason) = hook.before_query(&ctx) {
                return Err(OrmError::Aborted(reason));
            }
        }

        let body = statement.to_body()?;
        let started = Instant::now();
        let result = self
            .transport
            .post_query(&self.url, &self.config.api_token, body)
            .await
            .and_then(|raw| classify(raw.status, &raw.body));
        let elapsed = started.elapsed();

        if let Err(OrmError::Api { messages }) = &result {
            tracing::error!(
                target: "d1orm.sql",
                query_type = ?ctx.query_type,
                sql = %truncate_bytes(&ctx.sql, 200),
                "D1 query failed: {messages}"
            );
            for hook in &self.hooks {
                hook.on_failure(&ctx, messages);
            }
        }

        if !self.hooks.is_empty() {
            let summary = QueryResult::from_outcome(&result);
            for hook in &self.hooks {
                hook.after_query(&ctx, elapsed, &summary);
            }
        }

        result
    }
}

impl<T: Transport> GenericClient for D1Client<T> {
    fn execute(&self, statement: &Statement) -> impl Future<Output = OrmResult<QueryOutcome>> + Send {
        self.execute_statement(statement)
    }
}

impl<T> fmt::Debug for D1Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("D1Client")
            .field("config", &self.config)
            .field("hooks", &self.hooks.len())
            .finish_non_exhaustive()
    }
}
