//! Request extractors: tenant context and authenticated requester.
//!
//! The requester is taken from a JWT bearer token when an auth secret is
//! configured, with `X-User-*` headers as the development fallback. Webhook
//! and integration routes do not use these extractors; they carry the
//! tenant in the path/query and act as service callers.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::foundation::{Requester, TenantId, UserId};

use super::error::ApiError;
use super::AppState;

/// Tenant scope of the request, from the `x-tenant-id` header.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub TenantId);

#[async_trait]
impl FromRequestParts<AppState> for TenantContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let tenant_id = parts
            .headers
            .get("x-tenant-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<Uuid>().ok())
            .ok_or_else(|| ApiError::bad_request("Missing or invalid x-tenant-id header"))?;
        Ok(TenantContext(TenantId::from_uuid(tenant_id)))
    }
}

/// JWT claims carried by the bearer token.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default = "default_role")]
    role: String,
    #[allow(dead_code)]
    exp: usize,
}

fn default_role() -> String {
    "client".to_string()
}

fn requester_from(role: &str, user_id: UserId, email: Option<String>) -> Option<Requester> {
    match role {
        "client" => Some(Requester::client(user_id)),
        "staff" => email.map(|e| Requester::staff(user_id, e)),
        "admin" => Some(Requester::admin(user_id)),
        _ => None,
    }
}

/// Authenticated requester for role-scoped operations.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequester(pub Requester);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedRequester {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Bearer token first.
        let bearer = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if let (Some(token), Some(secret)) = (bearer, state.jwt_secret.as_deref()) {
            let claims = decode::<Claims>(
                token,
                &DecodingKey::from_secret(secret.as_bytes()),
                &Validation::default(),
            )
            .map_err(|e| ApiError::unauthorized(format!("Invalid token: {}", e)))?
            .claims;

            let requester = requester_from(
                &claims.role,
                UserId::from_uuid(claims.sub),
                claims.email,
            )
            .ok_or_else(|| ApiError::unauthorized("Unknown role in token"))?;
            return Ok(AuthenticatedRequester(requester));
        }

        // Development fallback: X-User-Id / X-User-Role / X-User-Email.
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let user_id = header("x-user-id")
            .and_then(|s| s.parse::<Uuid>().ok())
            .map(UserId::from_uuid)
            .ok_or_else(|| ApiError::unauthorized("Authentication is required"))?;
        let role = header("x-user-role").unwrap_or_else(|| "client".to_string());

        let requester = requester_from(&role, user_id, header("x-user-email"))
            .ok_or_else(|| ApiError::unauthorized("Unknown role"))?;
        Ok(AuthenticatedRequester(requester))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    #[test]
    fn role_mapping_covers_known_roles() {
        let user_id = UserId::new();
        assert_eq!(
            requester_from("client", user_id, None).unwrap().role,
            Role::Client
        );
        assert_eq!(
            requester_from("admin", user_id, None).unwrap().role,
            Role::Admin
        );
        assert_eq!(
            requester_from("staff", user_id, Some("s@x.com".to_string()))
                .unwrap()
                .role,
            Role::Staff
        );
        // Staff without an email cannot be matched to a professional.
        assert!(requester_from("staff", user_id, None).is_none());
        assert!(requester_from("superuser", user_id, None).is_none());
    }
}
