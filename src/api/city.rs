use crate::api::permissions;
use crate::auth::Claims;
use crate::domain::errors::is_unique_violation;
use crate::models::city::{self, Entity as City};
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
pub struct CreateCityRequest {
    name: String,
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCityRequest {
    name: Option<String>,
    description: Option<String>,
}

pub async fn list_cities(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
) -> impl IntoResponse {
    match City::find().order_by_asc(city::Column::Name).all(&db).await {
        Ok(cities) => (StatusCode::OK, Json(json!({ "data": cities }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn get_city(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match City::find_by_id(id).one(&db).await {
        Ok(Some(city)) => (StatusCode::OK, Json(city)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "City not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn create_city(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreateCityRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "city.create")?;

    let new_city = city::ActiveModel {
        name: Set(payload.name),
        description: Set(payload.description),
        ..Default::default()
    };

    Ok(match new_city.insert(&db).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) if is_unique_violation(&e) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "City already exists", "field": "name" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

pub async fn update_city(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCityRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "city.update")?;

    let city = match City::find_by_id(id).one(&db).await {
        Ok(Some(city)) => city,
        Ok(None) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "City not found" })),
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
    };

    let mut active: city::ActiveModel = city.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }

    Ok(match active.update(&db).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

pub async fn delete_city(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "city.delete")?;

    let city = match City::find_by_id(id).one(&db).await {
        Ok(Some(city)) => city,
        Ok(None) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "City not found" })),
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
    };

    Ok(match city.delete(&db).await {
        Ok(_) => (StatusCode::OK, Json(json!({ "message": "City deleted" }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}
