//! Services Layer
//!
//! Pure business logic without the HTTP layer. Functions are generic over
//! `ConnectionTrait` where they need to compose into a caller's
//! transaction (the unit of work is always explicit, never ambient).

pub mod checkout_service;
pub mod fare_service;
pub mod order_service;
pub mod route_service;
pub mod seat_service;
pub mod ticket_service;

use chrono::NaiveDateTime;

use crate::domain::DomainError;

pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub(crate) fn now_string() -> String {
    chrono::Local::now().format(DATETIME_FORMAT).to_string()
}

pub(crate) fn parse_datetime(
    value: &str,
    field: &'static str,
) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| {
        DomainError::validation(field, format!("expected datetime as '{}'", DATETIME_FORMAT))
    })
}
