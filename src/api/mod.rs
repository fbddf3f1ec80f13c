pub mod arrival_point;
pub mod auth;
pub mod carriage;
pub mod carriage_type;
pub mod city;
pub mod discount;
pub mod health;
pub mod order;
pub mod permissions;
pub mod route;
pub mod ticket;
pub mod user;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::db::AppState;
use crate::domain::DomainError;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::get_me))
        // Users
        .route("/users", get(user::list_users))
        .route("/users/:id", get(user::get_user))
        // Cities
        .route("/cities", get(city::list_cities).post(city::create_city))
        .route(
            "/cities/:id",
            get(city::get_city)
                .put(city::update_city)
                .delete(city::delete_city),
        )
        // Arrival points
        .route(
            "/arrival-points",
            get(arrival_point::list_points).post(arrival_point::create_point),
        )
        .route(
            "/arrival-points/:id",
            get(arrival_point::get_point).delete(arrival_point::delete_point),
        )
        // Carriage types
        .route(
            "/carriage-types",
            get(carriage_type::list_types).post(carriage_type::create_type),
        )
        .route("/carriage-types/:id", get(carriage_type::get_type))
        // Carriages
        .route(
            "/carriages",
            get(carriage::list_carriages).post(carriage::create_carriage),
        )
        .route(
            "/carriages/:id/available-seats",
            get(carriage::available_seats),
        )
        // Routes
        .route(
            "/routes",
            get(route::list_routes).post(route::create_route),
        )
        .route("/routes/search", post(route::search_routes))
        .route("/routes/:id", get(route::get_route))
        .route("/routes/:id/carriages", get(route::get_route_carriages))
        // Tickets
        .route(
            "/tickets",
            get(ticket::list_tickets).post(ticket::purchase_ticket),
        )
        // Orders
        .route("/orders", get(order::list_orders))
        .route(
            "/orders/:id",
            get(order::get_order).patch(order::patch_order),
        )
        .route("/orders/:id/buy", post(order::buy_order))
        // Discounts
        .route(
            "/discount-types",
            get(discount::list_types).post(discount::create_type),
        )
        .route(
            "/discounts",
            get(discount::list_discounts).post(discount::create_discount),
        )
        .with_state(state)
}

/// Single place where domain failures become HTTP responses.
pub(crate) fn error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::SeatTaken | DomainError::DiscountExhausted => StatusCode::CONFLICT,
        DomainError::PaymentProvider(_) => StatusCode::BAD_GATEWAY,
        DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    };

    let body = match &err {
        DomainError::Validation { field, message } => {
            json!({ "error": message, "field": field })
        }
        DomainError::SeatTaken | DomainError::SeatOutOfRange => {
            json!({ "error": err.to_string(), "field": "seat_number" })
        }
        _ => json!({ "error": err.to_string() }),
    };

    (status, Json(body)).into_response()
}
