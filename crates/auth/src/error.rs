//! Registry error model.

use thiserror::Error;

use crate::Role;

/// Malformed role definitions. Fatal: startup must not continue with a
/// partially built registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("role '{role}' extends undeclared role '{parent}'")]
    UnknownParent { role: Role, parent: Role },

    #[error("cyclic role inheritance: {}", format_cycle(.0))]
    CyclicInheritance(Vec<Role>),

    #[error("role '{0}' is declared more than once")]
    DuplicateRole(Role),

    #[error("empty {0} name in role definitions")]
    EmptyName(&'static str),
}

fn format_cycle(path: &[Role]) -> String {
    path.iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Query-time reference to a role the registry does not know.
///
/// Distinct from an ordinary denial: it usually means a stale or mistyped
/// role assignment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role '{role}'")]
pub struct UnknownRoleError {
    pub role: String,
}
