//! Read-only payroll query core.
//! This crate owns query specification, validation and execution; entity
//! lifecycle belongs to whoever seeds the database.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId, CompanyValidationError};
pub use model::payment::{Payment, PaymentId, PaymentValidationError};
pub use model::user::{PersonalInfo, User, UserId, UserValidationError};
pub use query::gateway::{GroupedValue, SqliteQueryGateway};
pub use query::{
    AggregateFn, EntityKind, FilterValue, GatewayError, GatewayResult, HavingPredicate, JoinSpec,
    QuerySpec, SortDirection, SortKey,
};
pub use repo::payment_repo::{
    CompanyAverage, PaymentRepository, ReceiverAverage, SqlitePaymentRepository,
};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::payroll_service::PayrollService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
