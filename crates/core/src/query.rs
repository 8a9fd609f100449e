//! Table query options and their query-string encoding.
//!
//! The client's `TableQuery` builder accumulates a [`QueryOptions`] and sends
//! it as query parameters; the `/api/db/{table}` handler decodes the same
//! parameters back. Keeping both directions here pins the wire format.

use crate::error::CoreError;

/// Reserved parameter carrying the ordering column.
pub const PARAM_ORDER_BY: &str = "orderBy";
/// Reserved parameter carrying `asc` or `desc`.
pub const PARAM_ORDER: &str = "order";
/// Reserved parameter carrying the row limit.
pub const PARAM_LIMIT: &str = "limit";
/// Reserved parameter carrying a comma-separated projection.
pub const PARAM_SELECT: &str = "select";

/// A single `field = value` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub ascending: bool,
}

/// Options accumulated by a table query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Projected columns; empty means all (`*`).
    pub select: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<u32>,
}

impl QueryOptions {
    /// Set the projection from a `"a, b, c"` or `"*"` string.
    pub fn select(mut self, fields: &str) -> Self {
        self.select = parse_projection(fields);
        self
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.to_string(),
        });
        self
    }

    pub fn order(mut self, field: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(OrderBy {
            field: field.into(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, count: u32) -> Self {
        self.limit = Some(count);
        self
    }

    /// Whether the caller expects a single row back.
    pub fn is_single(&self) -> bool {
        self.limit == Some(1)
    }

    /// Encode as ordered query-string pairs.
    ///
    /// Filters come first in insertion order, then `orderBy`/`order`, then
    /// `limit`, then `select` when a projection is set.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|f| (f.field.clone(), f.value.clone()))
            .collect();

        if let Some(order) = &self.order {
            pairs.push((PARAM_ORDER_BY.to_string(), order.field.clone()));
            let dir = if order.ascending { "asc" } else { "desc" };
            pairs.push((PARAM_ORDER.to_string(), dir.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push((PARAM_LIMIT.to_string(), limit.to_string()));
        }
        if !self.select.is_empty() {
            pairs.push((PARAM_SELECT.to_string(), self.select.join(",")));
        }
        pairs
    }

    /// Decode query-string pairs produced by [`Self::to_query_pairs`].
    ///
    /// Any key that is not reserved is an equality filter. Column names are
    /// not checked here; the storage layer validates them per table.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        let mut order_by: Option<String> = None;
        let mut direction: Option<bool> = None;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                PARAM_ORDER_BY => order_by = Some(value.to_string()),
                PARAM_ORDER => {
                    direction = Some(match value {
                        "asc" => true,
                        "desc" => false,
                        other => {
                            return Err(CoreError::Validation(format!(
                                "order must be 'asc' or 'desc', got '{other}'"
                            )))
                        }
                    });
                }
                PARAM_LIMIT => {
                    let limit = value.parse::<u32>().ok().filter(|l| *l > 0).ok_or_else(|| {
                        CoreError::Validation(format!(
                            "limit must be a positive integer, got '{value}'"
                        ))
                    })?;
                    options.limit = Some(limit);
                }
                PARAM_SELECT => options.select = parse_projection(value),
                field => options.filters.push(Filter {
                    field: field.to_string(),
                    value: value.to_string(),
                }),
            }
        }

        match (order_by, direction) {
            (Some(field), dir) => {
                options.order = Some(OrderBy {
                    field,
                    ascending: dir.unwrap_or(true),
                });
            }
            (None, Some(_)) => {
                return Err(CoreError::Validation(
                    "order requires orderBy".to_string(),
                ));
            }
            (None, None) => {}
        }

        Ok(options)
    }
}

fn parse_projection(fields: &str) -> Vec<String> {
    let fields: Vec<String> = fields
        .split(',')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();
    if fields.iter().any(|f| f == "*") {
        Vec::new()
    } else {
        fields
    }
}
