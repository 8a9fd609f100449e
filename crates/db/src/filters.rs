//! Typed table filters.
//!
//! [`QueryOptions`] arrive from the query string as plain strings. Before
//! they reach SQL every field name is checked against the table's column
//! list and every value is parsed into the column's type, so column names
//! interpolated into the statement are always `'static` whitelist entries.

use skycast_core::error::CoreError;
use skycast_core::query::QueryOptions;
use skycast_core::types::{DbId, Timestamp};
use sqlx::{Postgres, QueryBuilder};

/// Column holding the owning user on every user-scoped table.
pub const OWNER_COLUMN: &str = "user_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    BigInt,
    Float,
    Text,
    Bool,
    Timestamp,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn new(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind }
    }
}

/// The queryable columns of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableColumns {
    pub table: &'static str,
    pub columns: &'static [Column],
}

impl TableColumns {
    /// Look up a column by name, rejecting anything not on the list.
    pub fn column(&self, name: &str) -> Result<&'static Column, CoreError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown column '{name}' for table {}", self.table))
            })
    }
}

/// A filter value parsed into its column's type.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    BigInt(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Timestamp(Timestamp),
}

impl FilterValue {
    fn parse(column: &Column, raw: &str) -> Result<Self, CoreError> {
        let invalid = || {
            CoreError::Validation(format!("Invalid value '{raw}' for column '{}'", column.name))
        };
        Ok(match column.kind {
            ColumnKind::BigInt => Self::BigInt(raw.parse().map_err(|_| invalid())?),
            ColumnKind::Float => Self::Float(raw.parse().map_err(|_| invalid())?),
            ColumnKind::Text => Self::Text(raw.to_string()),
            ColumnKind::Bool => match raw {
                "true" => Self::Bool(true),
                "false" => Self::Bool(false),
                _ => return Err(invalid()),
            },
            ColumnKind::Timestamp => Self::Timestamp(
                chrono::DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| invalid())?
                    .with_timezone(&chrono::Utc),
            ),
        })
    }
}

/// Query options validated against a table.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedQuery {
    /// Projected columns; empty means every column.
    pub select: Vec<&'static str>,
    pub filters: Vec<(&'static str, FilterValue)>,
    /// `(column, ascending)`.
    pub order: Option<(&'static str, bool)>,
    pub limit: Option<i64>,
}

impl TypedQuery {
    pub fn resolve(table: &TableColumns, options: &QueryOptions) -> Result<Self, CoreError> {
        let select = options
            .select
            .iter()
            .map(|name| table.column(name).map(|c| c.name))
            .collect::<Result<Vec<_>, _>>()?;

        let filters = options
            .filters
            .iter()
            .map(|f| {
                let column = table.column(&f.field)?;
                Ok((column.name, FilterValue::parse(column, &f.value)?))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let order = options
            .order
            .as_ref()
            .map(|o| table.column(&o.field).map(|c| (c.name, o.ascending)))
            .transpose()?;

        Ok(Self {
            select,
            filters,
            order,
            limit: options.limit.map(i64::from),
        })
    }

    /// Restrict the query to rows owned by `user_id`.
    ///
    /// Owner filters naming the caller are dropped (the repository always
    /// scopes by owner); one naming anybody else is rejected.
    pub fn scope_to_user(&mut self, user_id: DbId) -> Result<(), CoreError> {
        let foreign = self.filters.iter().any(|(column, value)| {
            *column == OWNER_COLUMN && *value != FilterValue::BigInt(user_id)
        });
        if foreign {
            return Err(CoreError::Forbidden(
                "Cannot query rows belonging to another user".to_string(),
            ));
        }
        self.filters.retain(|(column, _)| *column != OWNER_COLUMN);
        Ok(())
    }

    /// Append ` AND column = $n` for each filter.
    pub fn push_conditions(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (column, value) in &self.filters {
            qb.push(" AND ").push(*column).push(" = ");
            match value {
                FilterValue::BigInt(v) => qb.push_bind(*v),
                FilterValue::Float(v) => qb.push_bind(*v),
                FilterValue::Text(v) => qb.push_bind(v.clone()),
                FilterValue::Bool(v) => qb.push_bind(*v),
                FilterValue::Timestamp(v) => qb.push_bind(*v),
            };
        }
    }

    /// Append `ORDER BY` (falling back to `default_order`) and `LIMIT`.
    pub fn push_order_and_limit(&self, qb: &mut QueryBuilder<'_, Postgres>, default_order: &str) {
        qb.push(" ORDER BY ");
        match self.order {
            Some((column, ascending)) => {
                qb.push(column).push(if ascending { " ASC" } else { " DESC" });
            }
            None => {
                qb.push(default_order);
            }
        }
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const CITIES: TableColumns = TableColumns {
        table: "saved_cities",
        columns: &[
            Column::new("id", ColumnKind::BigInt),
            Column::new("user_id", ColumnKind::BigInt),
            Column::new("city_name", ColumnKind::Text),
            Column::new("latitude", ColumnKind::Float),
            Column::new("is_default", ColumnKind::Bool),
            Column::new("created_at", ColumnKind::Timestamp),
        ],
    };

    #[test]
    fn resolves_typed_values() {
        let options = QueryOptions::default()
            .eq("is_default", true)
            .eq("latitude", 51.5)
            .eq("city_name", "London")
            .order("created_at", false)
            .limit(3);

        let typed = TypedQuery::resolve(&CITIES, &options).unwrap();
        assert_eq!(
            typed.filters,
            vec![
                ("is_default", FilterValue::Bool(true)),
                ("latitude", FilterValue::Float(51.5)),
                ("city_name", FilterValue::Text("London".to_string())),
            ]
        );
        assert_eq!(typed.order, Some(("created_at", false)));
        assert_eq!(typed.limit, Some(3));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let filter = QueryOptions::default().eq("password_hash", "x");
        assert_matches!(
            TypedQuery::resolve(&CITIES, &filter),
            Err(CoreError::Validation(_))
        );

        let order = QueryOptions::default().order("1; DROP TABLE users", true);
        assert_matches!(
            TypedQuery::resolve(&CITIES, &order),
            Err(CoreError::Validation(_))
        );

        let select = QueryOptions::default().select("city_name, secret");
        assert_matches!(
            TypedQuery::resolve(&CITIES, &select),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        for options in [
            QueryOptions::default().eq("user_id", "abc"),
            QueryOptions::default().eq("is_default", "yes"),
            QueryOptions::default().eq("created_at", "yesterday"),
        ] {
            assert_matches!(
                TypedQuery::resolve(&CITIES, &options),
                Err(CoreError::Validation(_))
            );
        }
    }

    #[test]
    fn scoping_drops_own_owner_filter() {
        let options = QueryOptions::default().eq("user_id", 7).eq("city_name", "Oslo");
        let mut typed = TypedQuery::resolve(&CITIES, &options).unwrap();
        typed.scope_to_user(7).unwrap();
        assert_eq!(
            typed.filters,
            vec![("city_name", FilterValue::Text("Oslo".to_string()))]
        );
    }

    #[test]
    fn scoping_rejects_foreign_owner() {
        let options = QueryOptions::default().eq("user_id", 8);
        let mut typed = TypedQuery::resolve(&CITIES, &options).unwrap();
        assert_matches!(typed.scope_to_user(7), Err(CoreError::Forbidden(_)));
    }

    #[test]
    fn builds_parameterised_sql() {
        let options = QueryOptions::default()
            .eq("city_name", "Paris")
            .eq("is_default", false)
            .order("created_at", false)
            .limit(10);
        let typed = TypedQuery::resolve(&CITIES, &options).unwrap();

        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM saved_cities WHERE user_id = ");
        qb.push_bind(1_i64);
        typed.push_conditions(&mut qb);
        typed.push_order_and_limit(&mut qb, "id ASC");

        assert_eq!(
            qb.sql(),
            "SELECT id FROM saved_cities WHERE user_id = $1 AND city_name = $2 \
             AND is_default = $3 ORDER BY created_at DESC LIMIT $4"
        );
    }

    #[test]
    fn default_order_without_limit() {
        let typed = TypedQuery::resolve(&CITIES, &QueryOptions::default()).unwrap();
        let mut qb = QueryBuilder::<Postgres>::new("SELECT id FROM saved_cities WHERE user_id = ");
        qb.push_bind(1_i64);
        typed.push_conditions(&mut qb);
        typed.push_order_and_limit(&mut qb, "id ASC");
        assert_eq!(
            qb.sql(),
            "SELECT id FROM saved_cities WHERE user_id = $1 ORDER BY id ASC"
        );
    }
}
