//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level
//! failures. The HTTP mapping lives at the api boundary.

use std::fmt;

#[derive(Debug, PartialEq)]
pub enum DomainError {
    /// Referenced entity absent
    NotFound(&'static str),
    /// Malformed or out-of-policy input, with the offending field
    Validation {
        field: &'static str,
        message: String,
    },
    /// Departure stop does not precede the arrival stop
    InvalidOrder,
    /// A ticket already holds this (carriage, seat_number)
    SeatTaken,
    /// Seat number outside 1..=seat_amount for the carriage
    SeatOutOfRange,
    /// Order not eligible for the requested transition
    InvalidState(String),
    /// Limited discount has reached its usage limit
    DiscountExhausted,
    /// External payment collaborator failed
    PaymentProvider(String),
    /// Database/persistence error
    Database(String),
}

impl DomainError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(what) => write!(f, "{} not found", what),
            DomainError::Validation { field, message } => {
                write!(f, "{}: {}", field, message)
            }
            DomainError::InvalidOrder => {
                write!(f, "departure stop must precede the arrival stop")
            }
            DomainError::SeatTaken => write!(f, "this seat is not available"),
            DomainError::SeatOutOfRange => {
                write!(f, "seat number is not found in this carriage")
            }
            DomainError::InvalidState(msg) => write!(f, "invalid state: {}", msg),
            DomainError::DiscountExhausted => write!(f, "discount is exhausted"),
            DomainError::PaymentProvider(msg) => {
                write!(f, "payment provider error: {}", msg)
            }
            DomainError::Database(msg) => write!(f, "database error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used by the services layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

/// SQLite reports constraint hits inside the error message; the unique
/// index on (carriage_id, seat_number) is the authoritative seat guard.
pub fn is_unique_violation(e: &sea_orm::DbErr) -> bool {
    e.to_string().contains("UNIQUE constraint failed")
}
