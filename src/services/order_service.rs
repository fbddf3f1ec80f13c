//! Order listing and the admin status patch.

use std::collections::HashMap;

use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::order::{self, Entity as Order, ORDER_STATUSES};
use crate::models::ticket::{self, Entity as Ticket};
use crate::services::{checkout_service, now_string};

/// Order with its tickets, for API responses.
#[derive(Debug, Serialize)]
pub struct OrderWithTickets {
    pub id: i32,
    pub status: String,
    pub total_price: f64,
    pub created_at: String,
    pub updated_at: String,
    pub tickets: Vec<ticket::Model>,
}

fn with_tickets(order: order::Model, tickets: Vec<ticket::Model>) -> OrderWithTickets {
    OrderWithTickets {
        id: order.id,
        status: order.status,
        total_price: order.total_price,
        created_at: order.created_at,
        updated_at: order.updated_at,
        tickets,
    }
}

/// Orders of one user, optionally filtered by status, with their tickets.
pub async fn list_orders<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    status: Option<String>,
) -> Result<Vec<OrderWithTickets>, DomainError> {
    let mut condition = Condition::all().add(order::Column::UserId.eq(user_id));

    if let Some(status) = status {
        if !ORDER_STATUSES.contains(&status.as_str()) {
            return Err(DomainError::validation("status", "no such status"));
        }
        condition = condition.add(order::Column::Status.eq(status));
    }

    let orders = Order::find()
        .filter(condition)
        .order_by_desc(order::Column::Id)
        .all(conn)
        .await?;

    let order_ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
    let mut tickets_by_order: HashMap<i32, Vec<ticket::Model>> = HashMap::new();

    if !order_ids.is_empty() {
        for ticket in Ticket::find()
            .filter(ticket::Column::OrderId.is_in(order_ids))
            .all(conn)
            .await?
        {
            if let Some(order_id) = ticket.order_id {
                tickets_by_order.entry(order_id).or_default().push(ticket);
            }
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let tickets = tickets_by_order.remove(&order.id).unwrap_or_default();
            with_tickets(order, tickets)
        })
        .collect())
}

/// One order of one user, with tickets.
pub async fn get_order<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    order_id: i32,
) -> Result<OrderWithTickets, DomainError> {
    let order = Order::find_by_id(order_id)
        .filter(order::Column::UserId.eq(user_id))
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("order"))?;

    let tickets = Ticket::find()
        .filter(ticket::Column::OrderId.eq(order.id))
        .all(conn)
        .await?;

    Ok(with_tickets(order, tickets))
}

/// Admin path: force an order's status, optionally running the owner's
/// discount against the total first. Discount bookkeeping and the status
/// change commit together.
pub async fn patch_order(
    db: &DatabaseConnection,
    order_id: i32,
    status: String,
    discount_id: Option<i32>,
) -> Result<order::Model, DomainError> {
    if !ORDER_STATUSES.contains(&status.as_str()) {
        return Err(DomainError::validation("order_status", "no such status"));
    }

    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("order"))?;

    let mut total_price = order.total_price;
    if let Some(discount_id) = discount_id {
        total_price =
            checkout_service::apply_discount(&txn, order.user_id, discount_id, total_price)
                .await?;
    }

    let mut active: order::ActiveModel = order.into();
    active.status = Set(status);
    active.total_price = Set(total_price);
    active.updated_at = Set(now_string());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    Ok(updated)
}
