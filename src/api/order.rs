use crate::api::{self, permissions};
use crate::auth::Claims;
use crate::db::AppState;
use crate::services::{checkout_service, order_service};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct ListOrdersQuery {
    status: Option<String>,
}

#[derive(Deserialize)]
pub struct PatchOrderRequest {
    order_status: String,
    discount_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct BuyOrderRequest {
    discount_id: Option<i32>,
}

pub async fn list_orders(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    match order_service::list_orders(&db, claims.uid, query.status).await {
        Ok(orders) => (StatusCode::OK, Json(json!({ "data": orders }))).into_response(),
        Err(e) => api::error_response(e),
    }
}

pub async fn get_order(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match order_service::get_order(&db, claims.uid, id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => api::error_response(e),
    }
}

/// PATCH /api/orders/:id - admin path for manual status transitions,
/// optionally applying the owner's discount to the total.
pub async fn patch_order(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<PatchOrderRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "order.patch")?;

    Ok(
        match order_service::patch_order(&db, id, payload.order_status, payload.discount_id).await
        {
            Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
            Err(e) => api::error_response(e),
        },
    )
}

/// POST /api/orders/:id/buy - checkout; returns the payment handle. The
/// order status stays untouched until the payment provider confirms out
/// of band.
pub async fn buy_order(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<i32>,
    payload: Option<Json<BuyOrderRequest>>,
) -> impl IntoResponse {
    let discount_id = payload.and_then(|Json(p)| p.discount_id);

    match checkout_service::checkout(
        &state.db,
        state.payments.as_ref(),
        claims.uid,
        id,
        discount_id,
    )
    .await
    {
        Ok(receipt) => (StatusCode::OK, Json(json!({ "payment": receipt }))).into_response(),
        Err(e) => api::error_response(e),
    }
}
