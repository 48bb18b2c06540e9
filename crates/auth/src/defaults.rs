//! Built-in back-office role set.
//!
//! Department roles only ever touch their own records, except where a
//! department needs a cross-team view (marketing reading leads, support
//! working every inquiry). `admin` extends every department role and holds
//! `Any` on all resources.

use crate::{Action, ActionScope, RoleDefinition};

pub const SALES: &str = "sales";
pub const MARKETING: &str = "marketing";
pub const SUPPORT: &str = "support";
pub const REPORTS_VIEWER: &str = "reports-viewer";
pub const REPORTS_MANAGER: &str = "reports-manager";
pub const FILES: &str = "files";
pub const ADMIN: &str = "admin";

fn crud_own() -> [ActionScope; 4] {
    Action::ALL.map(Action::own)
}

fn crud_any() -> [ActionScope; 4] {
    Action::ALL.map(Action::any)
}

pub fn business_roles() -> Vec<RoleDefinition> {
    let departments = vec![
        RoleDefinition::new(SALES)
            .grant("leads", crud_own())
            .grant("clients", crud_own())
            .grant("inquiries", crud_own())
            .grant("quotations", [ActionScope::CREATE_OWN, ActionScope::READ_OWN]),
        RoleDefinition::new(MARKETING)
            .grant("leads", [ActionScope::READ_ANY])
            .grant("inquiries", [ActionScope::READ_ANY])
            .grant("marketing-plans", crud_own()),
        RoleDefinition::new(SUPPORT)
            .grant("inquiries", [ActionScope::READ_ANY, ActionScope::UPDATE_ANY])
            .grant("clients", [ActionScope::READ_OWN]),
        RoleDefinition::new(REPORTS_VIEWER).grant("reports", [ActionScope::READ_ANY]),
        RoleDefinition::new(REPORTS_MANAGER).extends(REPORTS_VIEWER).grant(
            "reports",
            [
                ActionScope::CREATE_ANY,
                ActionScope::UPDATE_ANY,
                ActionScope::DELETE_ANY,
            ],
        ),
        RoleDefinition::new(FILES).grant(
            "files",
            [
                ActionScope::CREATE_OWN,
                ActionScope::READ_OWN,
                ActionScope::DELETE_OWN,
            ],
        ),
    ];

    let admin = departments
        .iter()
        .fold(RoleDefinition::new(ADMIN), |admin, dept| {
            admin.extends(dept.name.clone())
        })
        .grant("*", crud_any());

    let mut roles = departments;
    roles.push(admin);
    roles
}
