//! Declarative role definitions consumed once at startup.
//!
//! Definitions are plain values: build them with the fluent helpers below or
//! deserialize them from JSON, then hand the whole list to
//! [`Registry::build`](crate::Registry::build).

use serde::{Deserialize, Serialize};

use crate::{ActionScope, Resource, Role};

/// Grant of one or more actions on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantDefinition {
    pub resource: Resource,
    pub actions: Vec<ActionScope>,
}

/// One role record: `{ name, extends: [names], grants: [{resource, actions}] }`.
///
/// Unknown keys are rejected: a misspelled `extends` or `grants` must not
/// silently produce a role with fewer capabilities than intended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleDefinition {
    pub name: Role,

    #[serde(default)]
    pub extends: Vec<Role>,

    #[serde(default)]
    pub grants: Vec<GrantDefinition>,
}

impl RoleDefinition {
    pub fn new(name: impl Into<Role>) -> Self {
        Self {
            name: name.into(),
            extends: Vec::new(),
            grants: Vec::new(),
        }
    }

    /// Inherit every capability of `parent`.
    pub fn extends(mut self, parent: impl Into<Role>) -> Self {
        self.extends.push(parent.into());
        self
    }

    pub fn grant(
        mut self,
        resource: impl Into<Resource>,
        actions: impl IntoIterator<Item = ActionScope>,
    ) -> Self {
        self.grants.push(GrantDefinition {
            resource: resource.into(),
            actions: actions.into_iter().collect(),
        });
        self
    }
}

/// Parse an ordered list of role definitions from JSON.
pub fn parse_definitions(json: &str) -> Result<Vec<RoleDefinition>, serde_json::Error> {
    serde_json::from_str(json)
}
