use crate::api::permissions;
use crate::auth::Claims;
use crate::models::carriage_type::{self, Entity as CarriageType, CARRIAGE_KINDS};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct CreateCarriageTypeRequest {
    name: String,
    description: Option<String>,
}

pub async fn list_types(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
) -> impl IntoResponse {
    match CarriageType::find().all(&db).await {
        Ok(types) => (StatusCode::OK, Json(json!({ "data": types }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn get_type(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match CarriageType::find_by_id(id).one(&db).await {
        Ok(Some(carriage_type)) => (StatusCode::OK, Json(carriage_type)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Carriage type not found" })),
        )
            .into_response(),
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
    Json(payload): Json<CreateCarriageTypeRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "carriage_type.create")?;

    if !CARRIAGE_KINDS.contains(&payload.name.as_str()) {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid carriage type name", "field": "name" })),
        )
            .into_response());
    }

    let new_type = carriage_type::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
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
