use crate::api::permissions;
use crate::auth::Claims;
use crate::models::arrival_point::{self, Entity as ArrivalPoint};
use crate::models::city::{self, Entity as City};
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
pub struct CreatePointRequest {
    /// City is referenced by name, like the admin tooling does.
    city: String,
    place: String,
}

#[derive(Deserialize)]
pub struct ListPointsQuery {
    city_id: Option<i32>,
}

pub async fn list_points(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Query(query): Query<ListPointsQuery>,
) -> impl IntoResponse {
    let mut condition = Condition::all();
    if let Some(city_id) = query.city_id {
        condition = condition.add(arrival_point::Column::CityId.eq(city_id));
    }

    let points_with_cities = match ArrivalPoint::find()
        .filter(condition)
        .find_also_related(City)
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

    let data: Vec<Value> = points_with_cities
        .into_iter()
        .map(|(point, city)| {
            json!({
                "id": point.id,
                "place": point.place,
                "city": city.map(|c| c.name),
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "data": data }))).into_response()
}

pub async fn get_point(
    State(db): State<DatabaseConnection>,
    _claims: Claims,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let found = ArrivalPoint::find_by_id(id)
        .find_also_related(City)
        .one(&db)
        .await;

    match found {
        Ok(Some((point, city))) => (
            StatusCode::OK,
            Json(json!({
                "id": point.id,
                "place": point.place,
                "city": city.map(|c| c.name),
            })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Arrival point not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

pub async fn create_point(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<CreatePointRequest>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "arrival_point.create")?;

    let city = match City::find()
        .filter(city::Column::Name.eq(&payload.city))
        .one(&db)
        .await
    {
        Ok(Some(city)) => city,
        Ok(None) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "City does not exist", "field": "city" })),
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

    let new_point = arrival_point::ActiveModel {
        city_id: Set(city.id),
        place: Set(payload.place),
        ..Default::default()
    };

    Ok(match new_point.insert(&db).await {
        Ok(saved) => (StatusCode::CREATED, Json(saved)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

pub async fn delete_point(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "arrival_point.delete")?;

    let point = match ArrivalPoint::find_by_id(id).one(&db).await {
        Ok(Some(point)) => point,
        Ok(None) => {
            return Ok((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Arrival point not found" })),
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

    Ok(match point.delete(&db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "message": "Arrival point deleted" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}
