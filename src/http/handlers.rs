//! Demonstration handlers mounted by the host server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::observer::HandlerErrors;

/// `GET /health`
pub async fn health() -> &'static str {
    "OK"
}

/// `POST /users`: echoes the submitted JSON document back as created.
pub async fn create_user(Json(user): Json<Value>) -> Response {
    (StatusCode::CREATED, Json(json!({ "id": 1, "user": user }))).into_response()
}

/// `GET /fail`: always fails, reporting a private error for the access log.
pub async fn fail() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        HandlerErrors::private("upstream dependency unavailable"),
        "internal error",
    )
        .into_response()
}
