//! `bizops-auth` — role-based access control core.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns
//! declarative role definitions into an immutable [`Registry`] and answers
//! `(role, resource, action)` questions against it.

pub mod action;
pub mod authorize;
pub mod capability;
pub mod claims;
pub mod decision;
pub mod defaults;
pub mod definition;
pub mod error;
pub mod principal;
pub mod registry;
pub mod resource;
pub mod roles;

pub use action::{Action, ActionParseError, ActionScope, Scope};
pub use authorize::{
    ACCESS_DENIED, AuthorizationExplanation, AuthorizationOutcome, DenialReason, authorize,
    explain_authorization,
};
pub use capability::{Capability, CapabilitySet};
pub use claims::{AccessClaims, TokenValidationError, validate_claims};
pub use decision::{Decision, DecisionTrace};
pub use definition::{GrantDefinition, RoleDefinition, parse_definitions};
pub use error::{ConfigurationError, UnknownRoleError};
pub use principal::{Principal, PrincipalId};
pub use registry::{Registry, RoleSummary};
pub use resource::Resource;
pub use roles::Role;
