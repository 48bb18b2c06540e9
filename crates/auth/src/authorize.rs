use serde::Serialize;

use crate::{ActionScope, Capability, Principal, Registry, Role, Scope};

/// Generic message surfaced to clients on any denial.
pub const ACCESS_DENIED: &str = "access denied";

/// Why a request was denied.
///
/// Only for internal logs and audit: clients always see [`ACCESS_DENIED`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The principal carries no role.
    NoRole,
    /// The principal's role is not declared in the registry.
    UnknownRole,
    /// The role exists but lacks a matching capability.
    MissingCapability,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::NoRole => "no role",
            DenialReason::UnknownRole => "unknown role",
            DenialReason::MissingCapability => "missing capability",
        }
    }

    pub fn client_message(&self) -> &'static str {
        ACCESS_DENIED
    }
}

impl core::fmt::Display for DenialReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of gating one request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    Allowed { scope: Scope },
    Denied { reason: DenialReason },
}

impl AuthorizationOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthorizationOutcome::Allowed { .. })
    }

    pub fn scope(&self) -> Option<Scope> {
        match self {
            AuthorizationOutcome::Allowed { scope } => Some(*scope),
            AuthorizationOutcome::Denied { .. } => None,
        }
    }
}

/// Authorize `principal` to perform `action` on `resource`.
///
/// - No IO
/// - No panics
/// - Never fails: an unknown role is logged and treated as a denial
pub fn authorize(
    registry: &Registry,
    principal: &Principal,
    resource: &str,
    action: ActionScope,
) -> AuthorizationOutcome {
    let Some(role) = assigned_role(principal) else {
        tracing::debug!(
            principal_id = %principal.principal_id,
            resource,
            %action,
            "access denied: principal has no role"
        );
        return AuthorizationOutcome::Denied {
            reason: DenialReason::NoRole,
        };
    };

    match registry.can(role.as_str(), resource, action) {
        Ok(decision) => match decision.scope {
            Some(scope) if decision.is_granted() => AuthorizationOutcome::Allowed { scope },
            _ => {
                tracing::debug!(
                    principal_id = %principal.principal_id,
                    %role,
                    resource,
                    %action,
                    "access denied: missing capability"
                );
                AuthorizationOutcome::Denied {
                    reason: DenialReason::MissingCapability,
                }
            }
        },
        Err(err) => {
            tracing::warn!(
                principal_id = %principal.principal_id,
                %role,
                resource,
                %action,
                error = %err,
                "access denied: role not in registry (configuration drift?)"
            );
            AuthorizationOutcome::Denied {
                reason: DenialReason::UnknownRole,
            }
        }
    }
}

/// The principal's role, treating a blank role claim as no role at all.
///
/// The registry never declares an empty role name, so a blank claim is an
/// unassigned role rather than configuration drift.
fn assigned_role(principal: &Principal) -> Option<&Role> {
    principal.role().filter(|role| !role.as_str().trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this request allowed/denied?" for audit endpoints. Never
/// return this to the caller being denied.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub resource: String,
    pub action: ActionScope,
    pub outcome: AuthorizationOutcome,

    /// Human-readable reason for the decision.
    pub reason: String,

    /// Role whose own grant matched (may be an inherited role).
    pub granted_by: Option<Role>,

    pub role: Option<Role>,
    pub inherits: Vec<Role>,
    pub effective_capabilities: Vec<Capability>,
}

/// Explain the decision [`authorize`] makes for the same arguments, without
/// its logging.
pub fn explain_authorization(
    registry: &Registry,
    principal: &Principal,
    resource: &str,
    action: ActionScope,
) -> AuthorizationExplanation {
    let role = assigned_role(principal).cloned();

    // Reads the registry directly; audit lookups of unknown roles are not drift.
    let mut explanation = AuthorizationExplanation {
        resource: resource.to_string(),
        action,
        outcome: AuthorizationOutcome::Denied {
            reason: DenialReason::NoRole,
        },
        reason: String::new(),
        granted_by: None,
        role: role.clone(),
        inherits: Vec::new(),
        effective_capabilities: Vec::new(),
    };

    let Some(role) = role else {
        explanation.reason = "Principal has no role assigned".to_string();
        return explanation;
    };

    let Ok(trace) = registry.explain(role.as_str(), resource, action) else {
        explanation.outcome = AuthorizationOutcome::Denied {
            reason: DenialReason::UnknownRole,
        };
        explanation.reason = format!("Role '{role}' is not declared in the permission registry");
        return explanation;
    };

    let outcome = match trace.decision.scope {
        Some(scope) if trace.decision.is_granted() => AuthorizationOutcome::Allowed { scope },
        _ => AuthorizationOutcome::Denied {
            reason: DenialReason::MissingCapability,
        },
    };
    explanation.outcome = outcome;

    explanation.inherits = registry.parents(role.as_str()).map(<[Role]>::to_vec).unwrap_or_default();
    explanation.effective_capabilities = registry
        .effective_capabilities(role.as_str())
        .unwrap_or_default();
    explanation.granted_by = trace.granted_by.clone();

    explanation.reason = match (outcome, trace.granted_by) {
        (AuthorizationOutcome::Allowed { scope }, Some(source)) if source == role => {
            format!("Role '{role}' is granted {resource}:{action} with scope '{scope}'")
        }
        (AuthorizationOutcome::Allowed { scope }, Some(source)) => format!(
            "Role '{role}' inherits {resource}:{action} with scope '{scope}' from role '{source}'"
        ),
        (AuthorizationOutcome::Allowed { scope }, None) => {
            format!("Role '{role}' is granted {resource}:{action} with scope '{scope}'")
        }
        (AuthorizationOutcome::Denied { .. }, _) => format!(
            "Role '{role}' has no capability matching {resource}:{action}"
        ),
    };

    explanation
}
