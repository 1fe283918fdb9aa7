//! Structured query specifications and the gateway error taxonomy.
//!
//! # Responsibility
//! - Define the tagged-union query specification executed by the gateway.
//! - Keep query construction free of string concatenation at call sites:
//!   callers describe operations with typed values, never SQL fragments.
//!
//! # Invariants
//! - Field paths are validated against the data model before any SQL runs.
//! - Filter values always travel as bound parameters.

use crate::db::DbError;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod fields;
pub mod gateway;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Category of persisted object addressed by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Company,
    User,
    Payment,
}

impl EntityKind {
    /// Stable lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::User => "user",
            Self::Payment => "payment",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Scalar aggregate function applied to a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Avg,
    Sum,
    Count,
    Min,
    Max,
}

impl AggregateFn {
    pub(crate) fn sql_expr(self, column: &str) -> String {
        match self {
            Self::Avg => format!("AVG({column})"),
            Self::Sum => format!("SUM({column})"),
            Self::Count => format!("COUNT({column})"),
            Self::Min => format!("MIN({column})"),
            Self::Max => format!("MAX({column})"),
        }
    }
}

/// Typed equality-filter operand.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl FilterValue {
    pub(crate) fn to_sql_value(&self) -> Value {
        match self {
            Self::Text(text) => Value::Text(text.clone()),
            Self::Integer(value) => Value::Integer(*value),
            Self::Real(value) => Value::Real(*value),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

/// Sort direction for one ordering field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// One component of a composite sort key; earlier keys win ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Named inner-join relation between two entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSpec {
    /// Payment rows joined to their receiving user.
    PaymentReceiver,
    /// User rows joined to their employing company.
    UserEmployer,
}

impl JoinSpec {
    /// Entity kind whose rows the joined query hydrates.
    pub fn root(self) -> EntityKind {
        match self {
            Self::PaymentReceiver => EntityKind::Payment,
            Self::UserEmployer => EntityKind::User,
        }
    }
}

/// Post-aggregation group filter.
#[derive(Debug, Clone, PartialEq)]
pub enum HavingPredicate {
    /// Keep groups whose aggregate strictly exceeds the overall (ungrouped)
    /// aggregate of the same target field.
    AboveOverall,
    /// Keep groups whose aggregate strictly exceeds a literal threshold.
    GreaterThan(f64),
}

/// Declarative query executed by the gateway.
///
/// Each variant corresponds to one result shape; see
/// [`gateway::SqliteQueryGateway`] for the execution entry points.
#[derive(Debug, Clone, PartialEq)]
pub enum QuerySpec {
    /// Every row of one entity kind, storage order.
    ListAll { entity: EntityKind },
    /// Rows matching an exact equality filter on a dotted field path.
    ListByField {
        entity: EntityKind,
        field: String,
        value: FilterValue,
    },
    /// Rows sorted by one field and truncated; `limit = 0` yields nothing.
    ListOrderedLimited {
        entity: EntityKind,
        order_field: String,
        ascending: bool,
        limit: u32,
    },
    /// Inner-joined rows filtered by equality and sorted by a composite key
    /// with left-to-right tie-break.
    ListJoinedFiltered {
        join: JoinSpec,
        filter_field: String,
        value: FilterValue,
        order: Vec<SortKey>,
    },
    /// Single numeric aggregate over a filtered row set.
    ScalarAggregate {
        entity: EntityKind,
        aggregate: AggregateFn,
        target: String,
        filters: Vec<(String, FilterValue)>,
    },
    /// Per-group aggregates with optional having predicate and ordering.
    GroupedAggregate {
        entity: EntityKind,
        group_field: String,
        aggregate: AggregateFn,
        target: String,
        having: Option<HavingPredicate>,
        order_field: Option<String>,
    },
}

impl QuerySpec {
    /// Result shape implied by the variant, used in mismatch diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            Self::ListAll { .. }
            | Self::ListByField { .. }
            | Self::ListOrderedLimited { .. }
            | Self::ListJoinedFiltered { .. } => "entity rows",
            Self::ScalarAggregate { .. } => "scalar aggregate",
            Self::GroupedAggregate { .. } => "grouped aggregate",
        }
    }
}

/// Gateway error for query validation, DB transport and result decoding.
#[derive(Debug)]
pub enum GatewayError {
    /// Field path is not part of the addressed entity's data model.
    UnknownField { entity: EntityKind, path: String },
    /// Spec variant handed to an entry point of a different result shape.
    ShapeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// Session/connection failure; propagated, never retried here.
    Connectivity(DbError),
    /// Scalar aggregate had no defining row.
    EmptyResult,
    /// Persisted state failed hydration or validation.
    InvalidRow(String),
    /// Connection carries no applied schema (fresh or foreign database).
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownField { entity, path } => {
                write!(f, "unknown field path `{path}` for entity `{entity}`")
            }
            Self::ShapeMismatch { expected, actual } => {
                write!(f, "query spec yields {actual}, but {expected} was requested")
            }
            Self::Connectivity(err) => write!(f, "{err}"),
            Self::EmptyResult => write!(f, "scalar aggregate matched no rows"),
            Self::InvalidRow(message) => write!(f, "invalid persisted row: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Connectivity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Connectivity(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Connectivity(DbError::Sqlite(value))
    }
}
