//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

use bizops_auth::{RoleDefinition, defaults, parse_definitions};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// JSON role definitions; the built-in business roles when unset.
    pub roles_file: Option<PathBuf>,
}

impl ApiConfig {
    /// Read `BIZOPS_BIND_ADDR`, `JWT_SECRET` and `BIZOPS_ROLES_FILE`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr: SocketAddr = lookup("BIZOPS_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIZOPS_BIND_ADDR is not a socket address")?;

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let roles_file = lookup("BIZOPS_ROLES_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            bind_addr,
            jwt_secret,
            roles_file,
        })
    }

    /// Load the role definitions the registry is built from.
    pub fn role_definitions(&self) -> anyhow::Result<Vec<RoleDefinition>> {
        let Some(path) = &self.roles_file else {
            tracing::info!("BIZOPS_ROLES_FILE not set; using built-in business roles");
            return Ok(defaults::business_roles());
        };

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read role definitions from {}", path.display()))?;

        parse_definitions(&json)
            .with_context(|| format!("failed to parse role definitions in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.jwt_secret, "dev-secret");
        assert!(config.roles_file.is_none());
        assert_eq!(config.role_definitions().unwrap().len(), defaults::business_roles().len());
    }

    #[test]
    fn invalid_bind_addr_is_an_error() {
        assert!(config(&[("BIZOPS_BIND_ADDR", "not-an-addr")]).is_err());
    }

    #[test]
    fn loads_role_definitions_from_file() {
        let path = std::env::temp_dir().join(format!("bizops-roles-{}.json", uuid::Uuid::now_v7()));
        std::fs::write(
            &path,
            r#"[{ "name": "reports-viewer", "grants": [{ "resource": "reports", "actions": ["readAny"] }] }]"#,
        )
        .unwrap();

        let config = config(&[("BIZOPS_ROLES_FILE", path.to_str().unwrap())]).unwrap();
        let definitions = config.role_definitions().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].name.as_str(), "reports-viewer");
    }

    #[test]
    fn missing_roles_file_is_an_error() {
        let config = config(&[("BIZOPS_ROLES_FILE", "/nonexistent/bizops-roles.json")]).unwrap();
        assert!(config.role_definitions().is_err());
    }
}
