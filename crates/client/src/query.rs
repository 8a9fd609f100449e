//! Fluent query builder for the `/api/db/{table}` endpoints.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use skycast_core::query::QueryOptions;

use crate::client::Http;
use crate::error::ClientError;

/// Accumulates query options for one table and runs a single request.
///
/// ```ignore
/// let prefs = client
///     .from("user_preferences")
///     .select("*")
///     .eq("user_id", user.id)
///     .single()
///     .execute()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct TableQuery {
    http: Http,
    table: String,
    token: Option<String>,
    options: QueryOptions,
}

impl TableQuery {
    pub(crate) fn new(http: Http, table: &str, token: Option<String>) -> Self {
        Self {
            http,
            table: table.to_string(),
            token,
            options: QueryOptions::default(),
        }
    }

    /// Comma-separated column projection; `*` selects everything.
    pub fn select(mut self, fields: &str) -> Self {
        self.options = self.options.select(fields);
        self
    }

    pub fn eq(mut self, field: &str, value: impl ToString) -> Self {
        self.options = self.options.eq(field, value);
        self
    }

    pub fn order(mut self, field: &str, ascending: bool) -> Self {
        self.options = self.options.order(field, ascending);
        self
    }

    pub fn limit(mut self, count: u32) -> Self {
        self.options = self.options.limit(count);
        self
    }

    /// Ask for at most one row; [`execute`](Self::execute) then yields that
    /// row or `null` instead of an array.
    pub fn single(self) -> Self {
        self.limit(1)
    }

    /// The options gathered so far.
    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// `GET /api/db/{table}` with the options as query parameters.
    ///
    /// Yields the row array, or after [`single`](Self::single) the first row
    /// or `null`.
    pub async fn execute(self) -> Result<Value, ClientError> {
        let single = self.options.is_single();
        let rows = self.rows().await?;
        if !single {
            return Ok(rows);
        }
        Ok(match rows {
            Value::Array(rows) => rows.into_iter().next().unwrap_or(Value::Null),
            other => other,
        })
    }

    /// Run the query and decode every row.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, ClientError> {
        let rows = self.rows().await?;
        Ok(serde_json::from_value(rows)?)
    }

    /// Run the query with [`single`](Self::single) and decode the row.
    pub async fn fetch_one<T: DeserializeOwned>(self) -> Result<Option<T>, ClientError> {
        let row = self.single().execute().await?;
        Ok(serde_json::from_value(row)?)
    }

    /// `POST /api/db/{table}`; returns the created row.
    pub async fn insert<B: Serialize + ?Sized>(self, body: &B) -> Result<Value, ClientError> {
        let url = self.http.endpoint(&["api", "db", &self.table])?;
        let request = self.http.client().post(url).json(body);
        self.http
            .send(request, self.token.as_deref(), "Insert failed")
            .await
    }

    /// `PUT /api/db/{table}`; returns the stored row.
    pub async fn upsert<B: Serialize + ?Sized>(self, body: &B) -> Result<Value, ClientError> {
        let url = self.http.endpoint(&["api", "db", &self.table])?;
        let request = self.http.client().put(url).json(body);
        self.http
            .send(request, self.token.as_deref(), "Upsert failed")
            .await
    }

    async fn rows(self) -> Result<Value, ClientError> {
        let url = self.http.endpoint(&["api", "db", &self.table])?;
        let pairs = self.options.to_query_pairs();
        tracing::debug!(table = %self.table, params = pairs.len(), "Querying table");

        let request = self.http.client().get(url).query(&pairs);
        self.http
            .send(request, self.token.as_deref(), "Database query failed")
            .await
    }
}
