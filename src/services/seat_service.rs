//! Seat Allocator - availability sets and the reservation pre-check.

use std::collections::HashSet;

use sea_orm::*;

use crate::domain::DomainError;
use crate::models::carriage;
use crate::models::ticket::{self, Entity as Ticket};

/// Free seats of a carriage, ascending: {1..seat_amount} minus the seat
/// numbers already held by tickets.
pub async fn available_seats<C: ConnectionTrait>(
    conn: &C,
    carriage: &carriage::Model,
) -> Result<Vec<i32>, DomainError> {
    let taken: HashSet<i32> = Ticket::find()
        .filter(ticket::Column::CarriageId.eq(carriage.id))
        .all(conn)
        .await?
        .into_iter()
        .map(|t| t.seat_number)
        .collect();

    Ok((1..=carriage.seat_amount)
        .filter(|seat| !taken.contains(seat))
        .collect())
}

/// Purchase-time seat check. This is an optimization for a friendly error:
/// the unique index on (carriage_id, seat_number) remains the
/// authoritative guard against concurrent reservations.
pub async fn ensure_seat_free<C: ConnectionTrait>(
    conn: &C,
    carriage: &carriage::Model,
    seat_number: i32,
) -> Result<(), DomainError> {
    if seat_number < 1 || seat_number > carriage.seat_amount {
        return Err(DomainError::SeatOutOfRange);
    }

    let existing = Ticket::find()
        .filter(ticket::Column::CarriageId.eq(carriage.id))
        .filter(ticket::Column::SeatNumber.eq(seat_number))
        .one(conn)
        .await?;

    if existing.is_some() {
        return Err(DomainError::SeatTaken);
    }

    Ok(())
}
