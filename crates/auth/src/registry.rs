//! Permission registry: role → capability table with resolved inheritance.
//!
//! The registry is built once from declarative [`RoleDefinition`]s and is
//! read-only afterwards. Inheritance is resolved at construction into a
//! per-role effective capability set, so queries are a couple of map lookups
//! and never walk the role graph.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    ActionScope, Capability, CapabilitySet, ConfigurationError, Decision, DecisionTrace,
    Role, RoleDefinition, UnknownRoleError,
};

#[derive(Debug, Clone)]
struct RoleEntry {
    parents: Vec<Role>,
    direct: CapabilitySet,
    effective: CapabilitySet,
}

/// Immutable role → capability table.
///
/// Safe for unsynchronized concurrent reads; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Registry {
    roles: HashMap<Role, RoleEntry>,
    order: Vec<Role>,
}

/// Snapshot of one role for audit/display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSummary {
    pub name: Role,
    pub extends: Vec<Role>,
    pub direct: Vec<Capability>,
    pub effective: Vec<Capability>,
}

struct PendingRole {
    parents: Vec<Role>,
    direct: CapabilitySet,
}

impl Registry {
    /// Validate `definitions` and resolve inheritance.
    ///
    /// Fails on undeclared parents, cyclic inheritance, duplicate role names
    /// and empty names. Duplicate grants are merged.
    pub fn build(
        definitions: impl IntoIterator<Item = RoleDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let mut pending: HashMap<Role, PendingRole> = HashMap::new();
        let mut order: Vec<Role> = Vec::new();

        for def in definitions {
            if def.name.as_str().trim().is_empty() {
                return Err(ConfigurationError::EmptyName("role"));
            }
            if pending.contains_key(&def.name) {
                return Err(ConfigurationError::DuplicateRole(def.name));
            }

            let mut direct = CapabilitySet::new();
            for grant in def.grants {
                if grant.resource.as_str().trim().is_empty() {
                    return Err(ConfigurationError::EmptyName("resource"));
                }
                for action in grant.actions {
                    direct.insert(grant.resource.clone(), action);
                }
            }

            let mut parents: Vec<Role> = Vec::with_capacity(def.extends.len());
            for parent in def.extends {
                if !parents.contains(&parent) {
                    parents.push(parent);
                }
            }

            order.push(def.name.clone());
            pending.insert(def.name, PendingRole { parents, direct });
        }

        let mut resolved: HashMap<Role, CapabilitySet> = HashMap::with_capacity(pending.len());
        let mut path: Vec<Role> = Vec::new();
        for name in &order {
            if let Some(role) = pending.get(name) {
                resolve(name, role, &pending, &mut resolved, &mut path)?;
            }
        }

        let roles = pending
            .into_iter()
            .map(|(name, role)| {
                let effective = resolved.remove(&name).unwrap_or_default();
                let entry = RoleEntry {
                    parents: role.parents,
                    direct: role.direct,
                    effective,
                };
                (name, entry)
            })
            .collect();

        tracing::info!(roles = order.len(), "permission registry built");

        Ok(Self { roles, order })
    }

    /// Decide whether `role` may perform `action` on `resource`.
    ///
    /// An unknown role is an error, not a denial.
    pub fn can(
        &self,
        role: &str,
        resource: &str,
        action: ActionScope,
    ) -> Result<Decision, UnknownRoleError> {
        let entry = self.entry(role)?;

        Ok(match entry.effective.satisfying(resource, action) {
            Some(scope) => Decision::granted(scope),
            None => Decision::denied(),
        })
    }

    /// Like [`Registry::can`], also naming the role whose own grant matched.
    ///
    /// The role itself is preferred; otherwise parents are followed in
    /// declaration order.
    pub fn explain(
        &self,
        role: &str,
        resource: &str,
        action: ActionScope,
    ) -> Result<DecisionTrace, UnknownRoleError> {
        let entry = self.entry(role)?;

        let Some(scope) = entry.effective.satisfying(resource, action) else {
            return Ok(DecisionTrace {
                decision: Decision::denied(),
                granted_by: None,
            });
        };

        let mut current = (self.role_key(role), entry);
        let granted_by = loop {
            let (name, entry) = current;
            if entry.direct.satisfying(resource, action) == Some(scope) {
                break name.cloned();
            }
            let next = entry.parents.iter().find_map(|parent| {
                let (key, parent_entry) = self.roles.get_key_value(parent.as_str())?;
                (parent_entry.effective.satisfying(resource, action) == Some(scope))
                    .then_some((Some(key), parent_entry))
            });
            match next {
                Some(next) => current = next,
                None => break None,
            }
        };

        Ok(DecisionTrace {
            decision: Decision::granted(scope),
            granted_by,
        })
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    /// Role names in declaration order.
    pub fn role_names(&self) -> impl Iterator<Item = &Role> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Direct parents of `role`, in declaration order.
    pub fn parents(&self, role: &str) -> Result<&[Role], UnknownRoleError> {
        Ok(&self.entry(role)?.parents)
    }

    /// Effective capabilities of `role` (direct plus inherited), sorted.
    pub fn effective_capabilities(&self, role: &str) -> Result<Vec<Capability>, UnknownRoleError> {
        Ok(self.entry(role)?.effective.to_vec())
    }

    pub fn describe(&self, role: &str) -> Result<RoleSummary, UnknownRoleError> {
        let entry = self.entry(role)?;
        let name = self
            .role_key(role)
            .cloned()
            .unwrap_or_else(|| Role::new(role.to_string()));

        Ok(RoleSummary {
            name,
            extends: entry.parents.clone(),
            direct: entry.direct.to_vec(),
            effective: entry.effective.to_vec(),
        })
    }

    fn entry(&self, role: &str) -> Result<&RoleEntry, UnknownRoleError> {
        self.roles.get(role).ok_or_else(|| UnknownRoleError {
            role: role.to_string(),
        })
    }

    fn role_key(&self, role: &str) -> Option<&Role> {
        self.roles.get_key_value(role).map(|(key, _)| key)
    }
}

/// Depth-first resolution of the effective set of `name`.
///
/// `path` holds the roles currently being resolved; meeting one of them again
/// means the inheritance graph has a cycle.
fn resolve(
    name: &Role,
    role: &PendingRole,
    pending: &HashMap<Role, PendingRole>,
    resolved: &mut HashMap<Role, CapabilitySet>,
    path: &mut Vec<Role>,
) -> Result<(), ConfigurationError> {
    if resolved.contains_key(name) {
        return Ok(());
    }
    if let Some(start) = path.iter().position(|r| r == name) {
        let mut cycle = path[start..].to_vec();
        cycle.push(name.clone());
        return Err(ConfigurationError::CyclicInheritance(cycle));
    }

    path.push(name.clone());

    let mut effective = role.direct.clone();
    for parent in &role.parents {
        let parent_role = pending
            .get(parent)
            .ok_or_else(|| ConfigurationError::UnknownParent {
                role: name.clone(),
                parent: parent.clone(),
            })?;
        resolve(parent, parent_role, pending, resolved, path)?;
        if let Some(inherited) = resolved.get(parent) {
            effective.extend_from(inherited);
        }
    }

    path.pop();
    resolved.insert(name.clone(), effective);
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{Action, Resource, Scope};

    fn sales() -> RoleDefinition {
        RoleDefinition::new("sales").grant(
            "leads",
            [
                ActionScope::CREATE_OWN,
                ActionScope::READ_OWN,
                ActionScope::UPDATE_OWN,
                ActionScope::DELETE_OWN,
            ],
        )
    }

    #[test]
    fn direct_grants_decide_for_roles_without_parents() {
        let registry = Registry::build([sales()]).unwrap();

        let decision = registry.can("sales", "leads", ActionScope::READ_OWN).unwrap();
        assert_eq!(decision, Decision::granted(Scope::Own));

        assert!(!registry.can("sales", "leads", ActionScope::READ_ANY).unwrap().granted);
        assert!(!registry.can("sales", "reports", ActionScope::READ_OWN).unwrap().granted);
    }

    #[test]
    fn unknown_role_is_an_error_not_a_denial() {
        let registry = Registry::build([sales()]).unwrap();

        assert!(registry.contains("sales"));
        assert!(!registry.contains("sale"));

        let err = registry.can("sale", "leads", ActionScope::READ_OWN).unwrap_err();
        assert_eq!(err.role, "sale");
        assert!(registry.explain("nobody", "*", ActionScope::READ_ANY).is_err());
        assert!(registry.parents("nobody").is_err());
    }

    #[test]
    fn inherited_grants_are_part_of_the_effective_set() {
        let registry = Registry::build([
            RoleDefinition::new("reports-viewer").grant("reports", [ActionScope::READ_ANY]),
            RoleDefinition::new("reports-manager")
                .extends("reports-viewer")
                .grant("reports", [ActionScope::UPDATE_ANY]),
        ])
        .unwrap();

        assert!(registry.can("reports-manager", "reports", ActionScope::READ_ANY).unwrap().granted);
        assert!(registry.can("reports-manager", "reports", ActionScope::UPDATE_ANY).unwrap().granted);
        assert!(!registry.can("reports-viewer", "reports", ActionScope::UPDATE_ANY).unwrap().granted);
    }

    #[test]
    fn multi_parent_inheritance_is_a_union() {
        let registry = Registry::build([
            RoleDefinition::new("a").grant("leads", [ActionScope::READ_OWN]),
            RoleDefinition::new("b").grant("clients", [ActionScope::READ_ANY]),
            RoleDefinition::new("c").extends("a").extends("b"),
        ])
        .unwrap();

        assert!(registry.can("c", "leads", ActionScope::READ_OWN).unwrap().granted);
        assert!(registry.can("c", "clients", ActionScope::READ_ANY).unwrap().granted);
        assert_eq!(registry.parents("c").unwrap(), &[Role::new("a"), Role::new("b")]);
    }

    #[test]
    fn parents_may_be_declared_after_their_children() {
        let registry = Registry::build([
            RoleDefinition::new("child").extends("parent"),
            RoleDefinition::new("parent").grant("files", [ActionScope::READ_OWN]),
        ])
        .unwrap();

        assert!(registry.can("child", "files", ActionScope::READ_OWN).unwrap().granted);
    }

    #[test]
    fn diamond_inheritance_resolves_once() {
        let registry = Registry::build([
            RoleDefinition::new("base").grant("files", [ActionScope::READ_OWN]),
            RoleDefinition::new("left").extends("base"),
            RoleDefinition::new("right").extends("base"),
            RoleDefinition::new("top").extends("left").extends("right"),
        ])
        .unwrap();

        assert_eq!(registry.effective_capabilities("top").unwrap().len(), 1);
    }

    #[test]
    fn undeclared_parent_is_rejected() {
        let err = Registry::build([RoleDefinition::new("admin").extends("sales")]).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownParent {
                role: Role::new("admin"),
                parent: Role::new("sales"),
            }
        );
    }

    #[test]
    fn cyclic_inheritance_is_rejected() {
        let err = Registry::build([
            RoleDefinition::new("a").extends("b"),
            RoleDefinition::new("b").extends("a"),
        ])
        .unwrap_err();

        let ConfigurationError::CyclicInheritance(path) = err else {
            panic!("expected cyclic inheritance error");
        };
        assert_eq!(path, vec![Role::new("a"), Role::new("b"), Role::new("a")]);
    }

    #[test]
    fn self_extension_is_a_cycle() {
        let err = Registry::build([RoleDefinition::new("a").extends("a")]).unwrap_err();
        assert!(matches!(err, ConfigurationError::CyclicInheritance(_)));
        assert_eq!(err.to_string(), "cyclic role inheritance: a -> a");
    }

    #[test]
    fn longer_cycles_are_rejected() {
        let err = Registry::build([
            RoleDefinition::new("root"),
            RoleDefinition::new("a").extends("root").extends("c"),
            RoleDefinition::new("b").extends("a"),
            RoleDefinition::new("c").extends("b"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::CyclicInheritance(_)));
    }

    #[test]
    fn duplicate_roles_and_empty_names_are_rejected() {
        let err = Registry::build([RoleDefinition::new("a"), RoleDefinition::new("a")]).unwrap_err();
        assert_eq!(err, ConfigurationError::DuplicateRole(Role::new("a")));

        let err = Registry::build([RoleDefinition::new("")]).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyName("role"));

        let err = Registry::build([RoleDefinition::new("a").grant("", [ActionScope::READ_ANY])])
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyName("resource"));
    }

    #[test]
    fn duplicate_grants_are_merged() {
        let registry = Registry::build([RoleDefinition::new("a")
            .grant("leads", [ActionScope::READ_OWN, ActionScope::READ_OWN])
            .grant("leads", [ActionScope::READ_OWN])])
        .unwrap();

        assert_eq!(registry.effective_capabilities("a").unwrap().len(), 1);
    }

    #[test]
    fn wildcard_grant_matches_arbitrary_resources() {
        let registry =
            Registry::build([RoleDefinition::new("auditor").grant("*", [ActionScope::READ_ANY])])
                .unwrap();

        for resource in ["anything", "leads", "marketing-plans", ""] {
            assert!(registry.can("auditor", resource, ActionScope::READ_ANY).unwrap().granted);
            assert!(registry.can("auditor", resource, ActionScope::READ_OWN).unwrap().granted);
            assert!(!registry.can("auditor", resource, ActionScope::UPDATE_OWN).unwrap().granted);
        }
    }

    #[test]
    fn own_grant_does_not_imply_any() {
        let registry =
            Registry::build([RoleDefinition::new("rep").grant("leads", [ActionScope::UPDATE_OWN])])
                .unwrap();

        assert!(registry.can("rep", "leads", ActionScope::UPDATE_OWN).unwrap().granted);
        assert!(!registry.can("rep", "leads", ActionScope::UPDATE_ANY).unwrap().granted);
    }

    #[test]
    fn explain_names_the_granting_role() {
        let registry = Registry::build([
            RoleDefinition::new("viewer").grant("reports", [ActionScope::READ_ANY]),
            RoleDefinition::new("editor").grant("reports", [ActionScope::READ_OWN]),
            RoleDefinition::new("manager").extends("editor").extends("viewer"),
        ])
        .unwrap();

        let trace = registry.explain("manager", "reports", ActionScope::READ_OWN).unwrap();
        assert_eq!(trace.decision, Decision::granted(Scope::Any));
        assert_eq!(trace.granted_by, Some(Role::new("viewer")));

        let trace = registry.explain("manager", "reports", ActionScope::DELETE_ANY).unwrap();
        assert!(!trace.decision.granted);
        assert_eq!(trace.granted_by, None);
    }

    #[test]
    fn describe_lists_direct_and_effective_capabilities() {
        let registry = Registry::build([
            RoleDefinition::new("viewer").grant("reports", [ActionScope::READ_ANY]),
            RoleDefinition::new("manager")
                .extends("viewer")
                .grant("reports", [ActionScope::DELETE_ANY]),
        ])
        .unwrap();

        let summary = registry.describe("manager").unwrap();
        assert_eq!(summary.extends, vec![Role::new("viewer")]);
        assert_eq!(summary.direct.len(), 1);
        assert_eq!(
            summary.effective,
            vec![
                Capability {
                    resource: Resource::new("reports"),
                    action: Action::Read,
                    scope: Scope::Any,
                },
                Capability {
                    resource: Resource::new("reports"),
                    action: Action::Delete,
                    scope: Scope::Any,
                },
            ]
        );
        assert_eq!(
            registry.role_names().map(Role::as_str).collect::<Vec<_>>(),
            vec!["viewer", "manager"]
        );
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Registry>();
    }

    fn action_scope() -> impl Strategy<Value = ActionScope> {
        (0usize..4, any::<bool>()).prop_map(|(i, any)| {
            let scope = if any { Scope::Any } else { Scope::Own };
            ActionScope::new(Action::ALL[i], scope)
        })
    }

    fn grants() -> impl Strategy<Value = Vec<(usize, ActionScope)>> {
        prop::collection::vec((0usize..4, action_scope()), 0..6)
    }

    const RESOURCES: [&str; 4] = ["leads", "clients", "reports", "*"];

    fn role_with(name: &'static str, grants: &[(usize, ActionScope)]) -> RoleDefinition {
        grants.iter().fold(RoleDefinition::new(name), |def, (r, action)| {
            def.grant(RESOURCES[*r], [*action])
        })
    }

    proptest! {
        #[test]
        fn extension_order_does_not_change_effective_set(
            p1 in grants(),
            p2 in grants(),
            p3 in grants(),
            own in grants(),
        ) {
            let parents = [role_with("p1", &p1), role_with("p2", &p2), role_with("p3", &p3)];

            let forward = role_with("child", &own).extends("p1").extends("p2").extends("p3");
            let backward = role_with("child", &own).extends("p3").extends("p2").extends("p1");

            let a = Registry::build(parents.iter().cloned().chain([forward])).unwrap();
            let b = Registry::build(parents.iter().cloned().chain([backward])).unwrap();

            prop_assert_eq!(
                a.effective_capabilities("child").unwrap(),
                b.effective_capabilities("child").unwrap()
            );

            // Union: everything a parent or the child itself grants is granted.
            for (name, defs) in [("p1", &p1), ("p2", &p2), ("p3", &p3), ("child", &own)] {
                for (r, action) in defs.iter() {
                    let resource = if RESOURCES[*r] == "*" { "anything" } else { RESOURCES[*r] };
                    prop_assert!(a.can(name, resource, *action).unwrap().granted);
                    prop_assert!(a.can("child", resource, *action).unwrap().granted);
                }
            }
        }

        #[test]
        fn flat_role_grants_exactly_its_direct_grants(own in grants(), probe in (0usize..3, action_scope())) {
            let registry = Registry::build([role_with("r", &own)]).unwrap();
            let (r, action) = probe;
            let resource = RESOURCES[r];

            let expected = own.iter().any(|(gr, granted)| {
                (RESOURCES[*gr] == resource || RESOURCES[*gr] == "*")
                    && granted.action == action.action
                    && granted.scope.satisfies(action.scope)
            });

            prop_assert_eq!(registry.can("r", resource, action).unwrap().granted, expected);
        }
    }
}
