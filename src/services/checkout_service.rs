//! Checkout / Discount Engine.

use sea_orm::*;
use serde::Serialize;

use crate::domain::DomainError;
use crate::models::discount::Entity as Discount;
use crate::models::discount_type::{Entity as DiscountType, KIND_LIMITED, KIND_PERMANENT};
use crate::models::order::{Entity as Order, STATUS_FAIL, STATUS_PENDING, STATUS_SUCCESS};
use crate::payments::PaymentProvider;

const CURRENCY: &str = "usd";

/// What the caller hands to the payment UI.
#[derive(Debug, Serialize)]
pub struct CheckoutReceipt {
    pub payment_id: String,
    pub client_secret: String,
    pub amount_minor: i64,
}

/// Apply a user's discount to `price`, incrementing its usage and deleting
/// it once a limited discount reaches its limit. Runs on the caller's
/// connection so the bookkeeping joins the caller's transaction.
pub async fn apply_discount<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    discount_id: i32,
    price: f64,
) -> Result<f64, DomainError> {
    let discount = Discount::find_by_id(discount_id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("discount"))?;
    // Another user's discount is indistinguishable from a missing one.
    if discount.user_id != user_id {
        return Err(DomainError::NotFound("discount"));
    }

    let discount_type = DiscountType::find_by_id(discount.discount_type_id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound("discount type"))?;

    let limit = discount_type.discount_limit.unwrap_or(0);
    let usable = discount_type.kind == KIND_PERMANENT
        || (discount_type.kind == KIND_LIMITED && discount.usage_amount < limit);
    if !usable {
        return Err(DomainError::DiscountExhausted);
    }

    let discounted = price - price * discount_type.discount_percent / 100.0;

    let new_usage = discount.usage_amount + 1;
    if discount_type.kind == KIND_LIMITED && new_usage >= limit {
        // Exhausted: the discount row disappears with its last use.
        discount.delete(conn).await?;
    } else {
        let mut active: crate::models::discount::ActiveModel = discount.into();
        active.usage_amount = Set(new_usage);
        active.update(conn).await?;
    }

    Ok(discounted)
}

/// Finalize an order into a payment intent. Discount effects are applied
/// inside the transaction and committed only after the provider accepts,
/// so a payment failure leaves order and discount untouched. Moving the
/// order to success/fail is the payment webhook's business, not ours.
pub async fn checkout(
    db: &DatabaseConnection,
    payments: &dyn PaymentProvider,
    user_id: i32,
    order_id: i32,
    discount_id: Option<i32>,
) -> Result<CheckoutReceipt, DomainError> {
    let txn = db.begin().await?;

    let order = Order::find_by_id(order_id)
        .one(&txn)
        .await?
        .ok_or(DomainError::NotFound("order"))?;

    if order.user_id != user_id {
        return Err(DomainError::InvalidState(
            "order belongs to a different user".to_string(),
        ));
    }
    if order.status == STATUS_SUCCESS {
        return Err(DomainError::InvalidState(
            "order is already paid".to_string(),
        ));
    }
    if order.status != STATUS_PENDING && order.status != STATUS_FAIL {
        return Err(DomainError::InvalidState(format!(
            "order in status '{}' cannot be paid",
            order.status
        )));
    }
    if order.total_price <= 0.0 {
        return Err(DomainError::InvalidState(
            "order has nothing to pay".to_string(),
        ));
    }

    let mut final_price = order.total_price;
    if let Some(discount_id) = discount_id {
        final_price = apply_discount(&txn, user_id, discount_id, final_price).await?;
    }

    let amount_minor = (final_price * 100.0).round() as i64;

    let intent = payments
        .create_payment_intent(amount_minor, CURRENCY)
        .await
        // Dropping the transaction here rolls the discount usage back.
        .map_err(|e| DomainError::PaymentProvider(e.to_string()))?;

    txn.commit().await?;

    tracing::info!(
        "order {} checked out for {} minor units (intent {})",
        order_id,
        amount_minor,
        intent.id
    );

    Ok(CheckoutReceipt {
        payment_id: intent.id,
        client_secret: intent.client_secret,
        amount_minor,
    })
}
