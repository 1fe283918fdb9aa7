//! Payroll read-model entities.
//!
//! # Responsibility
//! - Define the canonical records hydrated by query operations.
//! - Provide read-side validation so bad persisted state is rejected,
//!   not masked.
//!
//! # Invariants
//! - Every entity is identified by a stable uuid.
//! - This core never creates, mutates, or deletes persisted entities.

pub mod company;
pub mod payment;
pub mod user;
