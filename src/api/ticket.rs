use crate::api;
use crate::auth::Claims;
use crate::services::ticket_service::{self, PurchaseTicketDto};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use sea_orm::DatabaseConnection;
use serde_json::json;

pub async fn list_tickets(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> impl IntoResponse {
    match ticket_service::list_user_tickets(&db, claims.uid).await {
        Ok(tickets) => (StatusCode::OK, Json(json!({ "data": tickets }))).into_response(),
        Err(e) => api::error_response(e),
    }
}

/// POST /api/tickets - buy a seat; the ticket lands on the caller's
/// pending order.
pub async fn purchase_ticket(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<PurchaseTicketDto>,
) -> impl IntoResponse {
    match ticket_service::purchase_ticket(&db, claims.uid, payload).await {
        Ok(ticket) => (StatusCode::CREATED, Json(json!({ "ticket": ticket }))).into_response(),
        Err(e) => api::error_response(e),
    }
}
