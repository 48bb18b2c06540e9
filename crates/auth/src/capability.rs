//! Capabilities: `(resource, action, scope)` grants and sets of them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Action, ActionScope, Resource, Scope};

/// A single granted capability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Capability {
    pub resource: Resource,
    pub action: Action,
    pub scope: Scope,
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}:{}",
            self.resource,
            ActionScope::new(self.action, self.scope)
        )
    }
}

/// Set of capabilities keyed by resource and action.
///
/// Only the widest scope per `(resource, action)` is kept: an `Any` grant
/// already satisfies every `Own` check, so adding `Own` next to it (or adding
/// the same grant twice) does not change what the set allows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    grants: BTreeMap<Resource, BTreeMap<Action, Scope>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    pub fn insert(&mut self, resource: Resource, grant: ActionScope) {
        let actions = self.grants.entry(resource).or_default();
        actions
            .entry(grant.action)
            .and_modify(|scope| *scope = (*scope).max(grant.scope))
            .or_insert(grant.scope);
    }

    pub fn extend_from(&mut self, other: &CapabilitySet) {
        for (resource, actions) in &other.grants {
            for (action, scope) in actions {
                self.insert(resource.clone(), ActionScope::new(*action, *scope));
            }
        }
    }

    /// Widest scope granted for `action` on `resource`, wildcard grants included.
    pub fn scope_for(&self, resource: &str, action: Action) -> Option<Scope> {
        let exact = self
            .grants
            .get(resource)
            .and_then(|actions| actions.get(&action).copied());
        let wildcard = self
            .grants
            .get(Resource::WILDCARD)
            .and_then(|actions| actions.get(&action).copied());

        exact.max(wildcard)
    }

    /// Scope of the grant that satisfies `required`, if any.
    pub fn satisfying(&self, resource: &str, required: ActionScope) -> Option<Scope> {
        self.scope_for(resource, required.action)
            .filter(|granted| granted.satisfies(required.scope))
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.grants.iter().flat_map(|(resource, actions)| {
            actions.iter().map(move |(action, scope)| Capability {
                resource: resource.clone(),
                action: *action,
                scope: *scope,
            })
        })
    }

    pub fn to_vec(&self) -> Vec<Capability> {
        self.iter().collect()
    }
}
