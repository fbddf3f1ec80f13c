use crate::api::{self, permissions};
use crate::auth::Claims;
use crate::models::carriage::{self, Entity as Carriage};
use crate::models::carriage_type::Entity as CarriageType;
use crate::models::route::Entity as Route;
use crate::services::route_service::MAX_SEAT_AMOUNT;
use crate::services::seat_service;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct CreateCarriageRequest {
    route_id: i32,
    carriage_type_id: i32,
    seat_amount: i32,
}

#[derive(Deserialize)]
pub struct ListCarriagesQuery {
    route_id: Option<i32>,
}

pub async fn list_carriages(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Query(query): Query<ListCarriagesQuery>,
) -> impl IntoResponse {
    let mut condition = Condition::all();
    if let Some(route_id) = query.route_id {
        condition = condition.add(carriage::Column::RouteId.eq(route_id));
    }

    match Carriage::find().filter(condition).all(&db).await {
        Ok(carriages) => (StatusCode::OK, Json(json!({ "data": carriages }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn create_carriage(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreateCarriageRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "carriage.create")?;

    if payload.seat_amount > MAX_SEAT_AMOUNT {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Max seat amount is 100", "field": "seat_amount" })),
        )
            .into_response());
    }
    if payload.seat_amount < 1 {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Seat amount must be positive", "field": "seat_amount" })),
        )
            .into_response());
    }

    let route = Route::find_by_id(payload.route_id).one(&db).await;
    match route {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found" })),
            )
                .into_response())
        }
        Err(e) => {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response())
        }
    }

    match CarriageType::find_by_id(payload.carriage_type_id).one(&db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Carriage type not found" })),
            )
                .into_response())
        }
        Err(e) => {
            return Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response())
        }
    }

    let new_carriage = carriage::ActiveModel {
        route_id: Set(payload.route_id),
        carriage_type_id: Set(payload.carriage_type_id),
        seat_amount: Set(payload.seat_amount),
        ..Default::default()
    };

    Ok(match new_carriage.insert(&db).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

#[utoipa::path(
    get,
    path = "/api/carriages/{id}/available-seats",
    params(
        ("id" = i32, Path, description = "Carriage id")
    ),
    responses(
        (status = 200, description = "Free seat numbers of the carriage"),
        (status = 404, description = "Carriage not found")
    )
)]
pub async fn available_seats(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let carriage = match Carriage::find_by_id(id).one(&db).await {
        Ok(Some(carriage)) => carriage,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Carriage not found" })),
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
    };

    match seat_service::available_seats(&db, &carriage).await {
        Ok(seats) => (StatusCode::OK, Json(json!({ "data": seats }))).into_response(),
        Err(e) => api::error_response(e),
    }
}
