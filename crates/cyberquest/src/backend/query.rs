//! Table names and the row filter builder.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Tables in the managed store.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Table {
    /// Per-user gamification state.
    Profiles,
    /// Aggregate counters per user.
    UserProgress,
    /// Append-only activity feed.
    UserActivity,
    /// One row per finished quiz.
    QuizHistory,
    /// One row per finished game.
    GameHistory,
    /// Quiz results shown on the profile page.
    TestResults,
}

/// A row filter, rendered as a PostgREST operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Filter {
    /// `column = value`
    Eq {
        /// Column name.
        column: String,
        /// Value as text.
        value: String,
    },
    /// `column >= value`
    Gte {
        /// Column name.
        column: String,
        /// Value as text.
        value: String,
    },
}

impl Filter {
    /// Equality filter.
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Eq {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Lower-bound filter.
    pub fn gte(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Gte {
            column: column.into(),
            value: value.to_string(),
        }
    }

    /// Column the filter applies to.
    pub fn column(&self) -> &str {
        match self {
            Self::Eq { column, .. } | Self::Gte { column, .. } => column,
        }
    }

    /// Query-string pair, e.g. `("user_id", "eq.42")`.
    pub fn to_param(&self) -> (String, String) {
        match self {
            Self::Eq { column, value } => (column.clone(), format!("eq.{}", value)),
            Self::Gte { column, value } => (column.clone(), format!("gte.{}", value)),
        }
    }

    /// Applies the filter to a JSON row.
    pub fn matches(&self, row: &Value) -> bool {
        let Some(cell) = row.get(self.column()) else {
            return false;
        };
        match self {
            Self::Eq { value, .. } => cell_text(cell).as_deref() == Some(value.as_str()),
            Self::Gte { value, .. } => {
                compare_cells(cell, &Value::String(value.clone())) != std::cmp::Ordering::Less
            }
        }
    }
}

/// Sort order on one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Order {
    column: String,
    ascending: bool,
}

/// A select over one table.
///
/// ```
/// use cyberquest::{Query, Table};
///
/// let query = Query::from(Table::GameHistory)
///     .eq("user_id", "u1")
///     .order("created_at", false)
///     .limit(10);
/// assert!(query.to_params().contains(&("limit".to_string(), "10".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Query {
    table: Table,
    columns: String,
    filters: Vec<Filter>,
    #[getter(rename = "order_by")]
    order: Option<Order>,
    #[getter(rename = "max_rows")]
    limit: Option<usize>,
}

impl Query {
    /// Selects every column of `table`.
    pub fn from(table: Table) -> Self {
        Self {
            table,
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restricts the returned columns.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Adds an equality filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::eq(column, value));
        self
    }

    /// Adds a lower-bound filter.
    pub fn gte(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push(Filter::gte(column, value));
        self
    }

    /// Sorts by `column`.
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Caps the number of rows.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query-string pairs.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.columns.clone())];
        params.extend(self.filters.iter().map(Filter::to_param));
        if let Some(order) = &self.order {
            let direction = if order.ascending { "asc" } else { "desc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Text form of a JSON cell as PostgREST would compare it.
pub(crate) fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Orders two cells: timestamps by instant, numbers by value, anything else
/// as text. Nulls sort first.
pub(crate) fn compare_cells(a: &Value, b: &Value) -> std::cmp::Ordering {
    use chrono::DateTime;
    use std::cmp::Ordering;

    let (Some(a), Some(b)) = (cell_text(a), cell_text(b)) else {
        return match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            _ => Ordering::Greater,
        };
    };
    if let (Ok(a), Ok(b)) = (DateTime::parse_from_rfc3339(&a), DateTime::parse_from_rfc3339(&b)) {
        return a.cmp(&b);
    }
    if let (Ok(a), Ok(b)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    }
    a.cmp(&b)
}
