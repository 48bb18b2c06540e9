//! API-side access gate.
//!
//! Enforces role/resource/action authorization on routes before handlers run,
//! while keeping the RBAC core HTTP-agnostic.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use bizops_auth::{ActionScope, AuthorizationOutcome, DenialReason, Principal, Registry, authorize};

use crate::app::errors;
use crate::context::AccessGrant;

/// What a gated route requires of the caller.
#[derive(Debug, Clone)]
pub struct AccessRequirement {
    registry: Arc<Registry>,
    resource: String,
    action: ActionScope,
}

impl AccessRequirement {
    pub fn new(registry: Arc<Registry>, resource: impl Into<String>, action: ActionScope) -> Self {
        Self {
            registry,
            resource: resource.into(),
            action,
        }
    }

    /// Run the check for `principal`, producing the grant on success.
    pub fn check(&self, principal: &Principal) -> Result<AccessGrant, DenialReason> {
        match authorize(&self.registry, principal, &self.resource, self.action) {
            AuthorizationOutcome::Allowed { scope } => Ok(AccessGrant::new(
                principal.clone(),
                self.resource.clone(),
                self.action,
                scope,
            )),
            AuthorizationOutcome::Denied { reason } => Err(reason),
        }
    }
}

/// Route layer: allow the request through only if the authenticated principal
/// satisfies the configured [`AccessRequirement`].
///
/// Must run after [`crate::middleware::authenticate`]. Every denial maps to the
/// same 403 body; the reason only reaches the logs.
pub async fn require_access(
    State(requirement): State<AccessRequirement>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(principal) = req.extensions().get::<Principal>().cloned() else {
        return errors::unauthorized();
    };

    match requirement.check(&principal) {
        Ok(grant) => {
            req.extensions_mut().insert(grant);
            next.run(req).await
        }
        Err(reason) => {
            tracing::info!(
                principal_id = %principal.principal_id,
                resource = %requirement.resource,
                action = %requirement.action,
                %reason,
                "request rejected by access gate"
            );
            errors::access_denied(reason)
        }
    }
}
