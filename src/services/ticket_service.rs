//! Ticket purchase - seat reservation, fare derivation and order
//! aggregation in a single transaction.

use sea_orm::*;
use serde::Deserialize;

use crate::domain::errors::is_unique_violation;
use crate::domain::DomainError;
use crate::models::carriage::Entity as Carriage;
use crate::models::order::{self, Entity as Order, STATUS_PENDING};
use crate::models::route::Entity as Route;
use crate::models::ticket::{self, Entity as Ticket};
use crate::services::{fare_service, now_string, seat_service};

#[derive(Debug, Deserialize)]
pub struct PurchaseTicketDto {
    pub carriage_id: i32,
    pub seat_number: i32,
    pub departure_point_id: i32,
    pub arrival_point_id: i32,
}

/// Buy one seat. The price is derived from the carriage's route, the
/// ticket is appended to the caller's pending order (created on demand),
/// and everything commits together: a ticket never exists without its
/// order-total effect.
pub async fn purchase_ticket(
    db: &DatabaseConnection,
    user_id: i32,
    dto: PurchaseTicketDto,
) -> Result<ticket::Model, DomainError> {
    let txn = db.begin().await?;

    let carriage = Carriage::find_by_id(dto.carriage_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("carriage"))?;

    seat_service::ensure_seat_free(&txn, &carriage, dto.seat_number).await?;

    let route = Route::find_by_id(carriage.route_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("route"))?;

    let price = fare_service::segment_price(
        &txn,
        &route,
        dto.departure_point_id,
        dto.arrival_point_id,
    )
    .await?;

    let now = now_string();

    // Append to the pending order, or open one. Totals are an append-only
    // ledger: nothing ever decrements them before checkout.
    let pending = Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .filter(order::Column::Status.eq(STATUS_PENDING))
        .one(&txn)
        .await?;

    let order = match pending {
        Some(existing) => {
            let new_total = existing.total_price + price;
            let mut active: order::ActiveModel = existing.into();
            active.total_price = Set(new_total);
            active.updated_at = Set(now.clone());
            active.update(&txn).await?
        }
        None => {
            order::ActiveModel {
                user_id: Set(user_id),
                status: Set(STATUS_PENDING.to_owned()),
                total_price: Set(price),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    let saved_ticket = ticket::ActiveModel {
        carriage_id: Set(dto.carriage_id),
        seat_number: Set(dto.seat_number),
        departure_point_id: Set(dto.departure_point_id),
        arrival_point_id: Set(dto.arrival_point_id),
        price: Set(price),
        order_id: Set(Some(order.id)),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        // Lost the race past the pre-check: the unique index decides.
        if is_unique_violation(&e) {
            DomainError::SeatTaken
        } else {
            e.into()
        }
    })?;

    txn.commit().await?;

    Ok(saved_ticket)
}

/// Tickets of one user, newest first (via their orders).
pub async fn list_user_tickets<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
) -> Result<Vec<ticket::Model>, DomainError> {
    let order_ids: Vec<i32> = Order::find()
        .filter(order::Column::UserId.eq(user_id))
        .all(conn)
        .await?
        .iter()
        .map(|o| o.id)
        .collect();

    if order_ids.is_empty() {
        return Ok(vec![]);
    }

    let tickets = Ticket::find()
        .filter(ticket::Column::OrderId.is_in(order_ids))
        .order_by_desc(ticket::Column::Id)
        .all(conn)
        .await?;

    Ok(tickets)
}
