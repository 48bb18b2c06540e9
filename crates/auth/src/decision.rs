use serde::Serialize;

use crate::{Role, Scope};

/// Result of a registry permission check.
///
/// `scope` is set only when `granted` is true and carries the widest matching
/// grant, so callers can narrow `Own` access to owned instances.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub granted: bool,
    pub scope: Option<Scope>,
}

impl Decision {
    pub fn granted(scope: Scope) -> Self {
        Self {
            granted: true,
            scope: Some(scope),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            scope: None,
        }
    }

    pub fn is_granted(&self) -> bool {
        self.granted
    }
}

/// A decision together with the role in the hierarchy that supplied the grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionTrace {
    pub decision: Decision,
    pub granted_by: Option<Role>,
}
