use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Principal, PrincipalId, Role};

/// Access token claims (transport-agnostic).
///
/// This is the minimal set of claims expected once a token has been
/// decoded/verified by whatever transport/security layer is in use. Issuing
/// tokens is not this crate's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    /// RBAC role of the principal, if one is assigned.
    #[serde(default)]
    pub role: Option<Role>,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

impl AccessClaims {
    pub fn into_principal(self) -> Principal {
        Principal {
            principal_id: self.sub,
            role: self.role,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate the claim time window.
///
/// Signature verification / decoding happens outside this crate.
pub fn validate_claims(
    claims: &AccessClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn claims(issued_offset_min: i64, ttl_min: i64) -> (AccessClaims, DateTime<Utc>) {
        let now = Utc::now();
        let issued_at = now + Duration::minutes(issued_offset_min);
        let claims = AccessClaims {
            sub: PrincipalId::new(),
            role: Some(Role::new("sales")),
            issued_at,
            expires_at: issued_at + Duration::minutes(ttl_min),
        };
        (claims, now)
    }

    #[test]
    fn accepts_claims_inside_their_window() {
        let (claims, now) = claims(-1, 10);
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn rejects_expired_future_and_inverted_windows() {
        let (expired, now) = claims(-20, 10);
        assert_eq!(validate_claims(&expired, now), Err(TokenValidationError::Expired));

        let (future, now) = claims(5, 10);
        assert_eq!(validate_claims(&future, now), Err(TokenValidationError::NotYetValid));

        let (inverted, now) = claims(-1, -5);
        assert_eq!(
            validate_claims(&inverted, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn missing_role_claim_yields_roleless_principal() {
        let json = serde_json::json!({
            "sub": PrincipalId::new(),
            "issued_at": Utc::now(),
            "expires_at": Utc::now() + Duration::minutes(5),
        });
        let claims: AccessClaims = serde_json::from_value(json).unwrap();
        assert_eq!(claims.into_principal().role, None);
    }
}
