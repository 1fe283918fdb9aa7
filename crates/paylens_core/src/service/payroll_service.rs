//! Payroll read use-case service.
//!
//! # Responsibility
//! - Provide stable query entry points for core callers.
//! - Delegate data access to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository hydration/validation contracts.
//! - Service layer remains storage-agnostic.

use crate::model::payment::Payment;
use crate::model::user::User;
use crate::query::GatewayResult;
use crate::repo::payment_repo::{CompanyAverage, PaymentRepository, ReceiverAverage};
use crate::repo::user_repo::UserRepository;

/// Use-case wrapper over the user and payment repositories.
pub struct PayrollService<U: UserRepository, P: PaymentRepository> {
    users: U,
    payments: P,
}

impl<U: UserRepository, P: PaymentRepository> PayrollService<U, P> {
    /// Creates a service using the provided repository implementations.
    pub fn new(users: U, payments: P) -> Self {
        Self { users, payments }
    }

    /// Returns every staff user.
    pub fn staff(&self) -> GatewayResult<Vec<User>> {
        self.users.find_all()
    }

    /// Returns staff with the exact first name.
    pub fn staff_by_first_name(&self, first_name: &str) -> GatewayResult<Vec<User>> {
        self.users.find_all_by_first_name(first_name)
    }

    /// Returns the `limit` oldest staff members first.
    pub fn oldest_staff(&self, limit: u32) -> GatewayResult<Vec<User>> {
        self.users.find_ordered_by_birth_date(limit)
    }

    /// Returns the named company's staff.
    pub fn company_staff(&self, company_name: &str) -> GatewayResult<Vec<User>> {
        self.users.find_all_by_company_name(company_name)
    }

    /// Returns payments received by the named company's staff, ordered by
    /// receiver first name then amount.
    pub fn company_payments(&self, company_name: &str) -> GatewayResult<Vec<Payment>> {
        self.payments.find_all_by_company_name(company_name)
    }

    /// Returns the named person's average payment amount.
    ///
    /// Fails with `EmptyResult` when the person received no payments.
    pub fn average_payment(&self, first_name: &str, last_name: &str) -> GatewayResult<f64> {
        self.payments
            .average_amount_by_receiver_name(first_name, last_name)
    }

    /// Returns each company's average payment amount, ordered by name.
    pub fn company_salary_report(&self) -> GatewayResult<Vec<CompanyAverage>> {
        self.payments.company_average_amounts()
    }

    /// Returns staff paid above the overall average, ordered by first name.
    pub fn top_earners(&self) -> GatewayResult<Vec<ReceiverAverage>> {
        self.payments.receivers_above_overall_average()
    }
}
