use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use bizops_auth::{ActionScope, Registry};

use crate::authz::{AccessRequirement, require_access};

pub mod rbac;
pub mod system;

/// Resource name guarding role introspection.
pub const ROLES_RESOURCE: &str = "roles";

/// Router for all authenticated endpoints.
pub fn router(registry: Arc<Registry>) -> Router {
    let role_admin = Router::new()
        .route("/roles", get(rbac::list_roles))
        .route("/roles/:name", get(rbac::get_role))
        .route("/explain", get(rbac::explain))
        .route_layer(from_fn_with_state(
            AccessRequirement::new(registry, ROLES_RESOURCE, ActionScope::READ_ANY),
            require_access,
        ));

    Router::new()
        .route("/whoami", get(system::whoami))
        .nest(
            "/rbac",
            Router::new()
                .route("/check", get(rbac::check))
                .merge(role_admin),
        )
}
