//! RBAC introspection endpoints.
//!
//! `/rbac/check` answers "may I?" for the caller. The remaining endpoints
//! expose the role table and decision explanations and sit behind the
//! `roles:readAny` gate.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, rejection::QueryRejection},
    response::{IntoResponse, Response},
};

use bizops_auth::{
    ActionScope, Principal, PrincipalId, Registry, authorize, explain_authorization,
};

use crate::app::dto::{CheckQuery, CheckResponse, ExplainQuery, RolesResponse};
use crate::app::errors;
use crate::context::AccessGrant;

/// GET /rbac/check - Decision for the current principal
pub async fn check(
    Extension(registry): Extension<Arc<Registry>>,
    Extension(principal): Extension<Principal>,
    query: Result<Query<CheckQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(err) => return errors::invalid_query(err.body_text()),
    };
    let action: ActionScope = match query.action.parse() {
        Ok(action) => action,
        Err(err) => return errors::invalid_action(err),
    };

    let outcome = authorize(&registry, &principal, &query.resource, action);

    Json(CheckResponse::new(query.resource, action.to_string(), outcome)).into_response()
}

/// GET /rbac/roles - List all roles with parents and capabilities
pub async fn list_roles(
    Extension(registry): Extension<Arc<Registry>>,
    Extension(grant): Extension<AccessGrant>,
) -> Response {
    tracing::debug!(
        principal_id = %grant.principal().principal_id,
        action = %grant.action(),
        scope = %grant.scope(),
        "listing roles"
    );

    let roles = registry
        .role_names()
        .filter_map(|name| registry.describe(name.as_str()).ok())
        .collect();

    Json(RolesResponse { roles }).into_response()
}

/// GET /rbac/roles/:name - One role
pub async fn get_role(
    Extension(registry): Extension<Arc<Registry>>,
    Path(name): Path<String>,
) -> Response {
    match registry.describe(&name) {
        Ok(role) => Json(role).into_response(),
        Err(_) => errors::not_found("role"),
    }
}

/// GET /rbac/explain?role=..&resource=..&action=.. - Why a role is allowed/denied
pub async fn explain(
    Extension(registry): Extension<Arc<Registry>>,
    Extension(grant): Extension<AccessGrant>,
    query: Result<Query<ExplainQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(err) => return errors::invalid_query(err.body_text()),
    };
    let action: ActionScope = match query.action.parse() {
        Ok(action) => action,
        Err(err) => return errors::invalid_action(err),
    };

    tracing::debug!(
        principal_id = %grant.principal().principal_id,
        action = %grant.action(),
        role = %query.role,
        resource = %query.resource,
        "explaining authorization"
    );

    let subject = Principal::new(PrincipalId::new(), query.role);
    let explanation = explain_authorization(&registry, &subject, &query.resource, action);

    Json(explanation).into_response()
}
