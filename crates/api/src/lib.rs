//! HTTP API: access-gated routing over the RBAC core.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod token;
