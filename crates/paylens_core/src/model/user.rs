//! Staff user domain model.
//!
//! # Invariants
//! - `birth_date` is an ISO-8601 calendar date (`YYYY-MM-DD`), so its
//!   lexicographic order equals chronological order.
//! - A user belongs to at most one company.

use crate::model::company::CompanyId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a staff user.
pub type UserId = Uuid;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("birth date pattern is a valid regex"));

/// Name and birth date grouped the way the storage schema flattens them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    /// ISO-8601 calendar date string.
    pub birth_date: String,
}

/// An employee record with an optional employer reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub personal_info: PersonalInfo,
    pub company_id: Option<CompanyId>,
}

/// Validation failure for persisted user state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyFirstName,
    EmptyLastName,
    InvalidBirthDate(String),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
            Self::InvalidBirthDate(value) => {
                write!(f, "birth date `{value}` is not an ISO-8601 date (YYYY-MM-DD)")
            }
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates an unemployed user with a generated stable ID.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name, birth_date)
    }

    /// Creates a user with a caller-provided stable ID.
    pub fn with_id(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            personal_info: PersonalInfo {
                first_name: first_name.into(),
                last_name: last_name.into(),
                birth_date: birth_date.into(),
            },
            company_id: None,
        }
    }

    /// Checks persisted-state invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.personal_info.first_name.trim().is_empty() {
            return Err(UserValidationError::EmptyFirstName);
        }
        if self.personal_info.last_name.trim().is_empty() {
            return Err(UserValidationError::EmptyLastName);
        }
        if !ISO_DATE.is_match(&self.personal_info.birth_date) {
            return Err(UserValidationError::InvalidBirthDate(
                self.personal_info.birth_date.clone(),
            ));
        }
        Ok(())
    }
}
