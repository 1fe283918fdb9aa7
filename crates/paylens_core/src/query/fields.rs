//! Static field-path registry for the payroll data model.
//!
//! # Responsibility
//! - Map each entity kind's dotted logical paths to SQL column expressions.
//! - Record the inner joins required to reach columns behind relations.
//!
//! # Invariants
//! - Unknown paths fail before any SQL is issued.
//! - Join order is fixed: receiver before employer, matching FK direction.

use crate::query::{EntityKind, GatewayError, GatewayResult, JoinSpec};

/// Inner-join edge in the payroll relation graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum JoinEdge {
    /// `payments.receiver_uuid -> users.uuid`
    Receiver,
    /// `users.company_uuid -> companies.uuid`
    Employer,
}

impl JoinEdge {
    pub(crate) fn sql(self) -> &'static str {
        match self {
            Self::Receiver => "INNER JOIN users ON users.uuid = payments.receiver_uuid",
            Self::Employer => "INNER JOIN companies ON companies.uuid = users.company_uuid",
        }
    }
}

/// Column expression plus the join closure needed to reach it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedField {
    pub(crate) column: &'static str,
    pub(crate) joins: &'static [JoinEdge],
}

impl EntityKind {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::User => "users",
            Self::Payment => "payments",
        }
    }

    /// Qualified, aliased select list hydrating this entity's rows.
    ///
    /// Columns are qualified so the list stays unambiguous under joins.
    pub(crate) fn select_columns(self) -> &'static str {
        match self {
            Self::Company => "companies.uuid AS uuid, companies.name AS name",
            Self::User => {
                "users.uuid AS uuid, users.first_name AS first_name, \
                 users.last_name AS last_name, users.birth_date AS birth_date, \
                 users.company_uuid AS company_uuid"
            }
            Self::Payment => {
                "payments.uuid AS uuid, payments.amount AS amount, \
                 payments.paid_at AS paid_at, payments.receiver_uuid AS receiver_uuid"
            }
        }
    }
}

impl JoinSpec {
    pub(crate) fn edges(self) -> &'static [JoinEdge] {
        match self {
            Self::PaymentReceiver => &[JoinEdge::Receiver],
            Self::UserEmployer => &[JoinEdge::Employer],
        }
    }
}

/// Resolves a dotted logical path rooted at `entity`.
pub(crate) fn resolve_field(entity: EntityKind, path: &str) -> GatewayResult<ResolvedField> {
    let resolved = match (entity, path) {
        (EntityKind::Company, "id") => direct("companies.uuid"),
        (EntityKind::Company, "name") => direct("companies.name"),

        (EntityKind::User, "id") => direct("users.uuid"),
        (EntityKind::User, "personal_info.first_name") => direct("users.first_name"),
        (EntityKind::User, "personal_info.last_name") => direct("users.last_name"),
        (EntityKind::User, "personal_info.birth_date") => direct("users.birth_date"),
        (EntityKind::User, "company.name") => ResolvedField {
            column: "companies.name",
            joins: &[JoinEdge::Employer],
        },

        (EntityKind::Payment, "id") => direct("payments.uuid"),
        (EntityKind::Payment, "amount") => direct("payments.amount"),
        (EntityKind::Payment, "paid_at") => direct("payments.paid_at"),
        (EntityKind::Payment, "receiver.id") => ResolvedField {
            column: "users.uuid",
            joins: &[JoinEdge::Receiver],
        },
        (EntityKind::Payment, "receiver.personal_info.first_name") => ResolvedField {
            column: "users.first_name",
            joins: &[JoinEdge::Receiver],
        },
        (EntityKind::Payment, "receiver.personal_info.last_name") => ResolvedField {
            column: "users.last_name",
            joins: &[JoinEdge::Receiver],
        },
        (EntityKind::Payment, "receiver.personal_info.birth_date") => ResolvedField {
            column: "users.birth_date",
            joins: &[JoinEdge::Receiver],
        },
        (EntityKind::Payment, "receiver.company.name") => ResolvedField {
            column: "companies.name",
            joins: &[JoinEdge::Receiver, JoinEdge::Employer],
        },

        _ => {
            return Err(GatewayError::UnknownField {
                entity,
                path: path.to_string(),
            })
        }
    };

    Ok(resolved)
}

fn direct(column: &'static str) -> ResolvedField {
    ResolvedField { column, joins: &[] }
}

/// Appends join edges not yet collected, preserving first-seen order.
pub(crate) fn collect_joins(acc: &mut Vec<JoinEdge>, edges: &[JoinEdge]) {
    for edge in edges {
        if !acc.contains(edge) {
            acc.push(*edge);
        }
    }
}
