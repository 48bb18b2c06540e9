use serde::{Deserialize, Serialize};

use bizops_auth::{AuthorizationOutcome, PrincipalId, Role, RoleSummary, Scope};

// -------------------------
// Request DTOs
// -------------------------

/// `GET /rbac/check?resource=..&action=..`
#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub resource: String,
    pub action: String,
}

/// `GET /rbac/explain?role=..&resource=..&action=..`
#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub role: String,
    pub resource: String,
    pub action: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct WhoAmIResponse {
    pub principal_id: PrincipalId,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub resource: String,
    pub action: String,
    pub granted: bool,
    pub scope: Option<Scope>,
}

impl CheckResponse {
    pub fn new(resource: String, action: String, outcome: AuthorizationOutcome) -> Self {
        Self {
            resource,
            action,
            granted: outcome.is_allowed(),
            scope: outcome.scope(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleSummary>,
}
