use crate::api::{self, permissions};
use crate::auth::Claims;
use crate::models::route::Entity as Route;
use crate::services::route_service::{self, CreateRouteDto, SearchRoutesDto};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::*;
use serde_json::{json, Value};

pub async fn list_routes(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
) -> impl IntoResponse {
    let routes = match Route::find().all(&db).await {
        Ok(routes) => routes,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    };

    match route_service::route_views(&db, routes).await {
        Ok(views) => (StatusCode::OK, Json(json!({ "data": views }))).into_response(),
        Err(e) => api::error_response(e),
    }
}

pub async fn get_route(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let route = match Route::find_by_id(id).one(&db).await {
        Ok(Some(route)) => route,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found" })),
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

    match route_service::route_views(&db, vec![route]).await {
        Ok(mut views) => match views.pop() {
            Some(view) => (StatusCode::OK, Json(view)).into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Route not found" })),
            )
                .into_response(),
        },
        Err(e) => api::error_response(e),
    }
}

pub async fn create_route(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreateRouteDto>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "route.create")?;

    Ok(match route_service::create_route(&db, payload).await {
        Ok((route, stops)) => (
            StatusCode::CREATED,
            Json(json!({ "route": route, "stops": stops })),
        )
            .into_response(),
        Err(e) => api::error_response(e),
    })
}

#[utoipa::path(
    post,
    path = "/api/routes/search",
    responses(
        (status = 200, description = "Routes matching the departure/arrival/day filters"),
        (status = 400, description = "Unknown city or malformed day")
    )
)]
pub async fn search_routes(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Json(payload): Json<SearchRoutesDto>,
) -> impl IntoResponse {
    let now = chrono::Local::now().naive_local();

    let routes = match route_service::search_routes(&db, &payload, now).await {
        Ok(routes) => routes,
        Err(e) => return api::error_response(e),
    };

    match route_service::route_views(&db, routes).await {
        Ok(views) => (StatusCode::OK, Json(json!({ "data": views }))).into_response(),
        Err(e) => api::error_response(e),
    }
}

pub async fn get_route_carriages(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match route_service::route_carriages(&db, id).await {
        Ok(views) => (StatusCode::OK, Json(json!({ "data": views }))).into_response(),
        Err(e) => api::error_response(e),
    }
}
