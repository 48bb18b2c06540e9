//! Actions and their ownership scopes.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CRUD verb a capability grants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    pub fn own(self) -> ActionScope {
        ActionScope::new(self, Scope::Own)
    }

    pub fn any(self) -> ActionScope {
        ActionScope::new(self, Scope::Any)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which instances of a resource an action applies to.
///
/// Ordered so that `Own < Any`: a wider grant compares greater.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only instances owned by the caller.
    Own,
    /// Every instance.
    Any,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Own => "own",
            Scope::Any => "any",
        }
    }

    /// Whether a grant of this scope satisfies a check for `required`.
    pub fn satisfies(self, required: Scope) -> bool {
        self >= required
    }

    /// Apply this scope to a concrete instance owned by `owner`.
    pub fn permits_owner<T: PartialEq + ?Sized>(self, owner: &T, caller: &T) -> bool {
        match self {
            Scope::Any => true,
            Scope::Own => owner == caller,
        }
    }
}

impl core::fmt::Display for Scope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid action '{0}' (expected e.g. 'readOwn', 'updateAny' or 'read:any')")]
pub struct ActionParseError(pub String);

/// An action paired with the scope it is requested or granted in.
///
/// Textual form is `readOwn`, `deleteAny`, ...; parsing also accepts
/// `read:own` and is case-insensitive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionScope {
    pub action: Action,
    pub scope: Scope,
}

impl ActionScope {
    pub const CREATE_OWN: ActionScope = ActionScope::new(Action::Create, Scope::Own);
    pub const CREATE_ANY: ActionScope = ActionScope::new(Action::Create, Scope::Any);
    pub const READ_OWN: ActionScope = ActionScope::new(Action::Read, Scope::Own);
    pub const READ_ANY: ActionScope = ActionScope::new(Action::Read, Scope::Any);
    pub const UPDATE_OWN: ActionScope = ActionScope::new(Action::Update, Scope::Own);
    pub const UPDATE_ANY: ActionScope = ActionScope::new(Action::Update, Scope::Any);
    pub const DELETE_OWN: ActionScope = ActionScope::new(Action::Delete, Scope::Own);
    pub const DELETE_ANY: ActionScope = ActionScope::new(Action::Delete, Scope::Any);

    pub const fn new(action: Action, scope: Scope) -> Self {
        Self { action, scope }
    }
}

impl core::fmt::Display for ActionScope {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let scope = match self.scope {
            Scope::Own => "Own",
            Scope::Any => "Any",
        };
        write!(f, "{}{}", self.action, scope)
    }
}

impl FromStr for ActionScope {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (action, scope) = match lowered.split_once(':') {
            Some((action, scope)) => (action, scope),
            None => {
                let split = lowered
                    .rfind("own")
                    .or_else(|| lowered.rfind("any"))
                    .ok_or_else(|| ActionParseError(s.to_string()))?;
                lowered.split_at(split)
            }
        };

        let action = match action {
            "create" => Action::Create,
            "read" => Action::Read,
            "update" => Action::Update,
            "delete" => Action::Delete,
            _ => return Err(ActionParseError(s.to_string())),
        };
        let scope = match scope {
            "own" => Scope::Own,
            "any" => Scope::Any,
            _ => return Err(ActionParseError(s.to_string())),
        };

        Ok(Self::new(action, scope))
    }
}

impl TryFrom<String> for ActionScope {
    type Error = ActionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionScope> for String {
    fn from(value: ActionScope) -> Self {
        value.to_string()
    }
}
