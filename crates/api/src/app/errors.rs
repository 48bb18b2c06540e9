use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bizops_auth::DenialReason;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn unauthorized() -> axum::response::Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
}

/// Rejection for a denied request. Every reason renders the same body.
pub fn access_denied(reason: DenialReason) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", reason.client_message())
}

pub fn invalid_query(err: impl ToString) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", err.to_string())
}

pub fn invalid_action(err: impl ToString) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_action", err.to_string())
}

pub fn not_found(what: &str) -> axum::response::Response {
    json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_denial_renders_the_same_status() {
        for reason in [
            DenialReason::NoRole,
            DenialReason::UnknownRole,
            DenialReason::MissingCapability,
        ] {
            assert_eq!(access_denied(reason).status(), StatusCode::FORBIDDEN);
        }
    }
}
