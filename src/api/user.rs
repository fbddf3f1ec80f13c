use crate::api::permissions;
use crate::auth::Claims;
use crate::models::user::{self, Entity as User};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::*;
use serde_json::{json, Value};

pub async fn list_users(
    State(db): State<DatabaseConnection>,
    claims: Claims,
) -> Result<Response, (StatusCode, Json<Value>)> {
    permissions::authorize(&claims, "user.list")?;

    Ok(match User::find().order_by_asc(user::Column::Id).all(&db).await {
        Ok(users) => (StatusCode::OK, Json(json!({ "data": users }))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}

pub async fn get_user(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Path(id): Path<i32>,
) -> Result<Response, (StatusCode, Json<Value>)> {
    // Users may read themselves; everything else is admin territory.
    if id != claims.uid {
        permissions::authorize(&claims, "user.retrieve")?;
    }

    Ok(match User::find_by_id(id).one(&db).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    })
}
