//! SQLite execution of structured query specifications.
//!
//! # Responsibility
//! - Generate parameterized SQL from a validated [`QuerySpec`].
//! - Execute one statement per call over a borrowed connection.
//!
//! # Invariants
//! - The gateway holds no state besides the borrowed connection.
//! - Values are always bound, never interpolated into SQL text.
//! - Sorted operations carry a trailing uuid tie-break so output order is
//!   deterministic.

use crate::query::fields::{collect_joins, resolve_field, JoinEdge};
use crate::query::{
    AggregateFn, EntityKind, FilterValue, GatewayError, GatewayResult, HavingPredicate, QuerySpec,
};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};

/// One `(group key, aggregate value)` pair from a grouped aggregate.
///
/// Group keys are read as TEXT; every groupable path in the field registry
/// resolves to a TEXT column (names and uuids).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedValue {
    pub key: String,
    pub value: f64,
}

/// Stateless query executor over a borrowed SQLite connection.
///
/// One session is assumed to serve one logical caller at a time; the
/// gateway adds no locking, retries, or timeouts of its own.
pub struct SqliteQueryGateway<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQueryGateway<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Executes a row-shaped spec (list/join variants) and maps each row.
    ///
    /// Empty matching sets yield an empty vector, never an error.
    pub fn fetch_rows<T>(
        &self,
        spec: &QuerySpec,
        mut map_row: impl FnMut(&Row<'_>) -> GatewayResult<T>,
    ) -> GatewayResult<Vec<T>> {
        let (sql, binds) = build_row_select(spec)?;

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(map_row(row)?);
        }

        Ok(items)
    }

    /// Executes a scalar aggregate spec.
    ///
    /// Fails with [`GatewayError::EmptyResult`] when the aggregate has no
    /// defining row (NULL result). `COUNT` over zero rows is defined and
    /// returns `0.0`.
    pub fn fetch_scalar(&self, spec: &QuerySpec) -> GatewayResult<f64> {
        let QuerySpec::ScalarAggregate {
            entity,
            aggregate,
            target,
            filters,
        } = spec
        else {
            return Err(shape_mismatch("scalar aggregate", spec));
        };

        let (sql, binds) = build_scalar_select(*entity, *aggregate, target, filters)?;
        let value: Option<f64> =
            self.conn
                .query_row(&sql, params_from_iter(binds), |row| row.get(0))?;

        value.ok_or(GatewayError::EmptyResult)
    }

    /// Executes a grouped aggregate spec.
    ///
    /// Groups with no matching rows do not appear; an empty table yields an
    /// empty vector.
    pub fn fetch_groups(&self, spec: &QuerySpec) -> GatewayResult<Vec<GroupedValue>> {
        let QuerySpec::GroupedAggregate {
            entity,
            group_field,
            aggregate,
            target,
            having,
            order_field,
        } = spec
        else {
            return Err(shape_mismatch("grouped aggregate", spec));
        };

        let (sql, binds) = build_grouped_select(
            *entity,
            group_field,
            *aggregate,
            target,
            having.as_ref(),
            order_field.as_deref(),
        )?;

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(binds))?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            let key: String = row.get("group_key")?;
            let value: Option<f64> = row.get("group_value")?;
            let value = value.ok_or_else(|| {
                GatewayError::InvalidRow(format!("null aggregate for group `{key}`"))
            })?;
            groups.push(GroupedValue { key, value });
        }

        Ok(groups)
    }
}

fn shape_mismatch(expected: &'static str, spec: &QuerySpec) -> GatewayError {
    GatewayError::ShapeMismatch {
        expected,
        actual: spec.shape(),
    }
}

fn build_row_select(spec: &QuerySpec) -> GatewayResult<(String, Vec<Value>)> {
    match spec {
        QuerySpec::ListAll { entity } => Ok((
            format!(
                "SELECT {} FROM {}",
                entity.select_columns(),
                entity.table()
            ),
            Vec::new(),
        )),

        QuerySpec::ListByField {
            entity,
            field,
            value,
        } => {
            let resolved = resolve_field(*entity, field)?;
            let mut joins = Vec::new();
            collect_joins(&mut joins, resolved.joins);

            let sql = format!(
                "SELECT {} FROM {}{} WHERE {} = ?",
                entity.select_columns(),
                entity.table(),
                join_clause(&joins),
                resolved.column
            );
            Ok((sql, vec![value.to_sql_value()]))
        }

        QuerySpec::ListOrderedLimited {
            entity,
            order_field,
            ascending,
            limit,
        } => {
            let resolved = resolve_field(*entity, order_field)?;
            let mut joins = Vec::new();
            collect_joins(&mut joins, resolved.joins);

            let direction = if *ascending { "ASC" } else { "DESC" };
            let sql = format!(
                "SELECT {} FROM {}{} ORDER BY {} {direction}, {}.uuid ASC LIMIT ?",
                entity.select_columns(),
                entity.table(),
                join_clause(&joins),
                resolved.column,
                entity.table()
            );
            Ok((sql, vec![Value::Integer(i64::from(*limit))]))
        }

        QuerySpec::ListJoinedFiltered {
            join,
            filter_field,
            value,
            order,
        } => {
            let root = join.root();
            let mut joins = Vec::new();
            collect_joins(&mut joins, join.edges());

            let filter = resolve_field(root, filter_field)?;
            collect_joins(&mut joins, filter.joins);

            let mut order_exprs = Vec::with_capacity(order.len() + 1);
            for key in order {
                let resolved = resolve_field(root, &key.field)?;
                collect_joins(&mut joins, resolved.joins);
                order_exprs.push(format!("{} {}", resolved.column, key.direction.sql()));
            }
            order_exprs.push(format!("{}.uuid ASC", root.table()));

            let sql = format!(
                "SELECT {} FROM {}{} WHERE {} = ? ORDER BY {}",
                root.select_columns(),
                root.table(),
                join_clause(&joins),
                filter.column,
                order_exprs.join(", ")
            );
            Ok((sql, vec![value.to_sql_value()]))
        }

        QuerySpec::ScalarAggregate { .. } | QuerySpec::GroupedAggregate { .. } => {
            Err(shape_mismatch("entity rows", spec))
        }
    }
}

fn build_scalar_select(
    entity: EntityKind,
    aggregate: AggregateFn,
    target: &str,
    filters: &[(String, FilterValue)],
) -> GatewayResult<(String, Vec<Value>)> {
    let resolved_target = resolve_field(entity, target)?;
    let mut joins = Vec::new();
    collect_joins(&mut joins, resolved_target.joins);

    let mut predicates = Vec::with_capacity(filters.len());
    let mut binds = Vec::with_capacity(filters.len());
    for (path, value) in filters {
        let resolved = resolve_field(entity, path)?;
        collect_joins(&mut joins, resolved.joins);
        predicates.push(format!("{} = ?", resolved.column));
        binds.push(value.to_sql_value());
    }

    let mut sql = format!(
        "SELECT {} FROM {}{}",
        aggregate.sql_expr(resolved_target.column),
        entity.table(),
        join_clause(&joins)
    );
    if !predicates.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));
    }

    Ok((sql, binds))
}

fn build_grouped_select(
    entity: EntityKind,
    group_field: &str,
    aggregate: AggregateFn,
    target: &str,
    having: Option<&HavingPredicate>,
    order_field: Option<&str>,
) -> GatewayResult<(String, Vec<Value>)> {
    let group = resolve_field(entity, group_field)?;
    let resolved_target = resolve_field(entity, target)?;

    let mut joins = Vec::new();
    collect_joins(&mut joins, group.joins);
    collect_joins(&mut joins, resolved_target.joins);

    let order = match order_field {
        Some(path) => {
            let resolved = resolve_field(entity, path)?;
            collect_joins(&mut joins, resolved.joins);
            Some(resolved.column)
        }
        None => None,
    };

    let aggregate_expr = aggregate.sql_expr(resolved_target.column);
    let mut sql = format!(
        "SELECT {} AS group_key, {aggregate_expr} AS group_value FROM {}{} GROUP BY {}",
        group.column,
        entity.table(),
        join_clause(&joins),
        group.column
    );

    let mut binds = Vec::new();
    match having {
        Some(HavingPredicate::AboveOverall) => {
            // The overall aggregate only needs the joins on the target path.
            let mut overall_joins = Vec::new();
            collect_joins(&mut overall_joins, resolved_target.joins);
            sql.push_str(&format!(
                " HAVING {aggregate_expr} > (SELECT {aggregate_expr} FROM {}{})",
                entity.table(),
                join_clause(&overall_joins)
            ));
        }
        Some(HavingPredicate::GreaterThan(threshold)) => {
            sql.push_str(&format!(" HAVING {aggregate_expr} > ?"));
            binds.push(Value::Real(*threshold));
        }
        None => {}
    }

    if let Some(column) = order {
        sql.push_str(&format!(" ORDER BY {column} ASC"));
    }

    Ok((sql, binds))
}

fn join_clause(joins: &[JoinEdge]) -> String {
    joins
        .iter()
        .map(|edge| format!(" {}", edge.sql()))
        .collect::<String>()
}
