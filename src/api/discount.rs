use crate::api::permissions;
use crate::auth::Claims;
use crate::models::discount::{self, Entity as Discount};
use crate::models::discount_type::{
    self, Entity as DiscountType, KIND_LIMITED, KIND_PERMANENT,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct CreateDiscountTypeRequest {
    kind: String,
    discount_percent: f64,
    discount_limit: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateDiscountRequest {
    discount_type_id: i32,
    /// Admins may grant a discount to any user; everyone else only to
    /// themselves.
    user_id: Option<i32>,
}

pub async fn list_types(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
) -> impl IntoResponse {
    match DiscountType::find().all(&db).await {
        Ok(types) => (StatusCode::OK, Json(json!({ "data": types }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn create_type(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreateDiscountTypeRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "discount_type.create")?;

    if payload.kind != KIND_LIMITED && payload.kind != KIND_PERMANENT {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid type name", "field": "kind" })),
        )
            .into_response());
    }
    if !(0.0..=100.0).contains(&payload.discount_percent) {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Percent must be within 0..100", "field": "discount_percent" })),
        )
            .into_response());
    }
    if payload.kind == KIND_LIMITED && payload.discount_limit.is_none() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Provide limit for discount if you set limited type",
                "field": "discount_limit"
            })),
        )
            .into_response());
    }

    // A permanent type silently drops a supplied limit.
    let discount_limit = if payload.kind == KIND_LIMITED {
        payload.discount_limit
    } else {
        None
    };

    let new_type = discount_type::ActiveModel {
        kind: Set(payload.kind),
        discount_percent: Set(payload.discount_percent),
        discount_limit: Set(discount_limit),
        ..Default::default()
    };

    Ok(match new_type.insert(&db).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

pub async fn list_discounts(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> impl IntoResponse {
    let discounts_with_types = match Discount::find()
        .filter(discount::Column::UserId.eq(claims.uid))
        .find_also_related(DiscountType)
        .all(&db)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    let data: Vec<Value> = discounts_with_types
        .into_iter()
        .map(|(discount, discount_type)| {
            json!({
                "id": discount.id,
                "usage_amount": discount.usage_amount,
                "discount_type": discount_type,
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "data": data }))).into_response()
}

pub async fn create_discount(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreateDiscountRequest>,
) -> impl IntoResponse {
    let user_id = payload.user_id.unwrap_or(claims.uid);
    if user_id != claims.uid && claims.role != "admin" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Cannot grant discounts to other users" })),
        )
            .into_response();
    }

    match DiscountType::find_by_id(payload.discount_type_id).one(&db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Discount type not found" })),
            )
                .into_response()
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }

    let new_discount = discount::ActiveModel {
        user_id: Set(user_id),
        discount_type_id: Set(payload.discount_type_id),
        usage_amount: Set(0),
        ..Default::default()
    };

    match new_discount.insert(&db).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
