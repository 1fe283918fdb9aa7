//! User query repository mirroring the legacy staff directory lookups.
//!
//! # Responsibility
//! - Expose the user-facing read operations as a trait over the gateway.
//! - Keep field paths and join wiring out of caller code.
//!
//! # Invariants
//! - Equality filters are exact-match; no case folding, no partial match.
//! - `find_ordered_by_birth_date` with `limit = 0` returns an empty list.

use crate::model::user::User;
use crate::query::gateway::SqliteQueryGateway;
use crate::query::{EntityKind, FilterValue, GatewayError, GatewayResult, QuerySpec};
use crate::repo::ensure_schema_ready;
use rusqlite::{Connection, Row};
use uuid::Uuid;

/// Read contract for staff user lookups.
pub trait UserRepository {
    /// Returns every user, storage order.
    fn find_all(&self) -> GatewayResult<Vec<User>>;
    /// Returns users whose first name matches exactly.
    fn find_all_by_first_name(&self, first_name: &str) -> GatewayResult<Vec<User>>;
    /// Returns the first `limit` users ordered by ascending birth date.
    fn find_ordered_by_birth_date(&self, limit: u32) -> GatewayResult<Vec<User>>;
    /// Returns users employed by the named company.
    fn find_all_by_company_name(&self, company_name: &str) -> GatewayResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    gateway: SqliteQueryGateway<'conn>,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> GatewayResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self {
            gateway: SqliteQueryGateway::new(conn),
        })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn find_all(&self) -> GatewayResult<Vec<User>> {
        self.gateway.fetch_rows(
            &QuerySpec::ListAll {
                entity: EntityKind::User,
            },
            parse_user_row,
        )
    }

    fn find_all_by_first_name(&self, first_name: &str) -> GatewayResult<Vec<User>> {
        self.gateway.fetch_rows(
            &QuerySpec::ListByField {
                entity: EntityKind::User,
                field: "personal_info.first_name".to_string(),
                value: FilterValue::from(first_name),
            },
            parse_user_row,
        )
    }

    fn find_ordered_by_birth_date(&self, limit: u32) -> GatewayResult<Vec<User>> {
        self.gateway.fetch_rows(
            &QuerySpec::ListOrderedLimited {
                entity: EntityKind::User,
                order_field: "personal_info.birth_date".to_string(),
                ascending: true,
                limit,
            },
            parse_user_row,
        )
    }

    fn find_all_by_company_name(&self, company_name: &str) -> GatewayResult<Vec<User>> {
        self.gateway.fetch_rows(
            &QuerySpec::ListByField {
                entity: EntityKind::User,
                field: "company.name".to_string(),
                value: FilterValue::from(company_name),
            },
            parse_user_row,
        )
    }
}

/// Hydrates one user row; shared with the payment repository.
pub(crate) fn parse_user_row(row: &Row<'_>) -> GatewayResult<User> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "users.uuid")?;

    let company_id = match row.get::<_, Option<String>>("company_uuid")? {
        Some(text) => Some(parse_uuid(&text, "users.company_uuid")?),
        None => None,
    };

    let mut user = User::with_id(
        id,
        row.get::<_, String>("first_name")?,
        row.get::<_, String>("last_name")?,
        row.get::<_, String>("birth_date")?,
    );
    user.company_id = company_id;
    user.validate()
        .map_err(|err| GatewayError::InvalidRow(err.to_string()))?;

    Ok(user)
}

pub(crate) fn parse_uuid(value: &str, source: &str) -> GatewayResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| GatewayError::InvalidRow(format!("invalid uuid value `{value}` in {source}")))
}
