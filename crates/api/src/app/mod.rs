//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use bizops_auth::Registry;

use crate::middleware;
use crate::token::Hs256TokenVerifier;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// The registry is built and validated by the caller before any request can
/// reach the router.
pub fn build_app(jwt_secret: &str, registry: Arc<Registry>) -> Router {
    let verifier = Arc::new(Hs256TokenVerifier::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { verifier };

    // Protected routes: require an authenticated principal.
    let protected = routes::router(registry.clone())
        .layer(Extension(registry))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::authenticate,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
