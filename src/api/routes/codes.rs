use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::models::Pagination;
use crate::api::AppState;

pub async fn list_codes(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let limit = page.limit.min(500);
    match state.db.list_codes(limit, page.offset) {
        Ok(codes) => Ok(Json(json!({
            "codes": codes,
            "limit": limit,
            "offset": page.offset,
        }))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}

pub async fn get_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.db.get_code(&id) {
        Ok(Some(code)) => Ok(Json(json!(code))),
        Ok(None) => Err((StatusCode::NOT_FOUND, Json(json!({"error": "Code not found"})))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}

pub async fn get_sightings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    // 404 for an unknown code rather than an empty list
    match state.db.get_code(&id) {
        Ok(Some(_)) => {}
        Ok(None) => return Err((StatusCode::NOT_FOUND, Json(json!({"error": "Code not found"})))),
        Err(e) => {
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()}))))
        }
    }

    match state.db.list_sightings(&id) {
        Ok(sightings) => Ok(Json(json!({"qr_code_id": id, "sightings": sightings}))),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": e.to_string()})))),
    }
}
