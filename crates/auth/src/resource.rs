use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Name of a protected entity class (e.g. "leads", "reports").
///
/// Resources are free-form strings. The wildcard resource `"*"` matches every
/// resource name when used in a grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Cow<'static, str>);

impl Resource {
    pub const WILDCARD: &'static str = "*";

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn wildcard() -> Self {
        Self(Cow::Borrowed(Self::WILDCARD))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == Self::WILDCARD
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::borrow::Borrow<str> for Resource {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl From<&'static str> for Resource {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Resource {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
