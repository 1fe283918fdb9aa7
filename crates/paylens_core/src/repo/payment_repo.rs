//! Payment query repository: joined listings and salary aggregates.
//!
//! # Responsibility
//! - Expose payment read operations and aggregate reports over the gateway.
//! - Hydrate receiver users for the above-overall-average report.
//!
//! # Invariants
//! - Scalar averages over zero matching payments fail with `EmptyResult`,
//!   never a placeholder value.
//! - Joined listings use inner joins; payments of unemployed users do not
//!   appear in company-scoped results.

use crate::model::payment::Payment;
use crate::model::user::User;
use crate::query::gateway::SqliteQueryGateway;
use crate::query::{
    AggregateFn, EntityKind, FilterValue, GatewayError, GatewayResult, HavingPredicate, JoinSpec,
    QuerySpec, SortKey,
};
use crate::repo::ensure_schema_ready;
use crate::repo::user_repo::{parse_user_row, parse_uuid};
use rusqlite::{Connection, Row};
use serde::Serialize;

/// Per-company average payment amount, one row per company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyAverage {
    pub company_name: String,
    pub average_amount: f64,
}

/// A receiver whose average payment exceeds the overall average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiverAverage {
    pub user: User,
    pub average_amount: f64,
}

/// Read contract for payment lookups and salary reports.
pub trait PaymentRepository {
    /// Payments received by the named company's staff, ordered by receiver
    /// first name, then amount, both ascending.
    fn find_all_by_company_name(&self, company_name: &str) -> GatewayResult<Vec<Payment>>;
    /// Average payment amount for the named person.
    fn average_amount_by_receiver_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> GatewayResult<f64>;
    /// Average payment amount per company, ordered by company name.
    fn company_average_amounts(&self) -> GatewayResult<Vec<CompanyAverage>>;
    /// Receivers whose per-user average strictly exceeds the overall
    /// average, ordered by first name.
    fn receivers_above_overall_average(&self) -> GatewayResult<Vec<ReceiverAverage>>;
}

/// SQLite-backed payment repository.
pub struct SqlitePaymentRepository<'conn> {
    gateway: SqliteQueryGateway<'conn>,
}

impl<'conn> SqlitePaymentRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> GatewayResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self {
            gateway: SqliteQueryGateway::new(conn),
        })
    }
}

impl PaymentRepository for SqlitePaymentRepository<'_> {
    fn find_all_by_company_name(&self, company_name: &str) -> GatewayResult<Vec<Payment>> {
        self.gateway.fetch_rows(
            &QuerySpec::ListJoinedFiltered {
                join: JoinSpec::PaymentReceiver,
                filter_field: "receiver.company.name".to_string(),
                value: FilterValue::from(company_name),
                order: vec![
                    SortKey::ascending("receiver.personal_info.first_name"),
                    SortKey::ascending("amount"),
                ],
            },
            parse_payment_row,
        )
    }

    fn average_amount_by_receiver_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> GatewayResult<f64> {
        self.gateway.fetch_scalar(&QuerySpec::ScalarAggregate {
            entity: EntityKind::Payment,
            aggregate: AggregateFn::Avg,
            target: "amount".to_string(),
            filters: vec![
                (
                    "receiver.personal_info.first_name".to_string(),
                    FilterValue::from(first_name),
                ),
                (
                    "receiver.personal_info.last_name".to_string(),
                    FilterValue::from(last_name),
                ),
            ],
        })
    }

    fn company_average_amounts(&self) -> GatewayResult<Vec<CompanyAverage>> {
        let groups = self.gateway.fetch_groups(&QuerySpec::GroupedAggregate {
            entity: EntityKind::Payment,
            group_field: "receiver.company.name".to_string(),
            aggregate: AggregateFn::Avg,
            target: "amount".to_string(),
            having: None,
            order_field: Some("receiver.company.name".to_string()),
        })?;

        Ok(groups
            .into_iter()
            .map(|group| CompanyAverage {
                company_name: group.key,
                average_amount: group.value,
            })
            .collect())
    }

    fn receivers_above_overall_average(&self) -> GatewayResult<Vec<ReceiverAverage>> {
        let groups = self.gateway.fetch_groups(&QuerySpec::GroupedAggregate {
            entity: EntityKind::Payment,
            group_field: "receiver.id".to_string(),
            aggregate: AggregateFn::Avg,
            target: "amount".to_string(),
            having: Some(HavingPredicate::AboveOverall),
            order_field: Some("receiver.personal_info.first_name".to_string()),
        })?;

        let mut receivers = Vec::with_capacity(groups.len());
        for group in groups {
            let users = self.gateway.fetch_rows(
                &QuerySpec::ListByField {
                    entity: EntityKind::User,
                    field: "id".to_string(),
                    value: FilterValue::Text(group.key.clone()),
                },
                parse_user_row,
            )?;
            let user = users.into_iter().next().ok_or_else(|| {
                GatewayError::InvalidRow(format!(
                    "payment group references missing user `{}`",
                    group.key
                ))
            })?;
            receivers.push(ReceiverAverage {
                user,
                average_amount: group.value,
            });
        }

        Ok(receivers)
    }
}

fn parse_payment_row(row: &Row<'_>) -> GatewayResult<Payment> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "payments.uuid")?;

    let receiver_text: String = row.get("receiver_uuid")?;
    let receiver_id = parse_uuid(&receiver_text, "payments.receiver_uuid")?;

    let mut payment = Payment::with_id(id, row.get("amount")?, receiver_id);
    payment.paid_at = row.get("paid_at")?;
    payment
        .validate()
        .map_err(|err| GatewayError::InvalidRow(err.to_string()))?;

    Ok(payment)
}
