use axum::{Json, extract::Extension, http::StatusCode};

use bizops_auth::Principal;

use crate::app::dto::WhoAmIResponse;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        principal_id: principal.principal_id,
        role: principal.role,
    })
}
