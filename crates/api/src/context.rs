use bizops_auth::{ActionScope, Principal, PrincipalId, Scope};

/// Record of the access gate letting a request through.
///
/// Inserted into request extensions by [`crate::authz::require_access`] so the
/// collaborator that loads the resource can apply the granted scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    principal: Principal,
    resource: String,
    action: ActionScope,
    scope: Scope,
}

impl AccessGrant {
    pub fn new(principal: Principal, resource: impl Into<String>, action: ActionScope, scope: Scope) -> Self {
        Self {
            principal,
            resource: resource.into(),
            action,
            scope,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn action(&self) -> ActionScope {
        self.action
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Whether the grant covers an instance owned by `owner`.
    pub fn permits_owner(&self, owner: &PrincipalId) -> bool {
        self.scope.permits_owner(owner, &self.principal.principal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_grant_is_limited_to_owned_instances() {
        let me = PrincipalId::new();
        let other = PrincipalId::new();
        let grant = AccessGrant::new(Principal::new(me, "sales"), "leads", ActionScope::READ_OWN, Scope::Own);

        assert!(grant.permits_owner(&me));
        assert!(!grant.permits_owner(&other));
    }

    #[test]
    fn any_grant_covers_every_instance() {
        let grant = AccessGrant::new(
            Principal::new(PrincipalId::new(), "admin"),
            "leads",
            ActionScope::READ_OWN,
            Scope::Any,
        );
        assert!(grant.permits_owner(&PrincipalId::new()));
    }
}
