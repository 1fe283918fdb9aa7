//! Payment domain model.
//!
//! # Invariants
//! - Every payment has exactly one receiver.
//! - `amount` is a positive integral sum in minor currency units.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a payment.
pub type PaymentId = Uuid;

/// A single payout received by a staff user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount: i64,
    /// Unix epoch milliseconds; `None` for legacy rows without a timestamp.
    pub paid_at: Option<i64>,
    pub receiver_id: UserId,
}

/// Validation failure for persisted payment state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    NonPositiveAmount(i64),
}

impl Display for PaymentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "payment amount must be positive, got {amount}")
            }
        }
    }
}

impl Error for PaymentValidationError {}

impl Payment {
    /// Creates a payment with a generated stable ID and no timestamp.
    pub fn new(amount: i64, receiver_id: UserId) -> Self {
        Self::with_id(Uuid::new_v4(), amount, receiver_id)
    }

    /// Creates a payment with a caller-provided stable ID.
    pub fn with_id(id: PaymentId, amount: i64, receiver_id: UserId) -> Self {
        Self {
            id,
            amount,
            paid_at: None,
            receiver_id,
        }
    }

    /// Checks persisted-state invariants.
    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if self.amount <= 0 {
            return Err(PaymentValidationError::NonPositiveAmount(self.amount));
        }
        Ok(())
    }
}
