//! Authorization guards for the admin tiers.
//!
//! The session middleware verifies the token and inserts an [`AdminSession`];
//! these extractors check that the session's tier covers the route.
//! Super admins pass every admin guard.

use crate::core::error::AppError;
use crate::features::auth::model::{AdminSession, AdminTier};
use axum::{extract::FromRequestParts, http::request::Parts};

fn session_with_tier(parts: &Parts, required: AdminTier) -> Result<AdminSession, AppError> {
    let session = parts
        .extensions
        .get::<AdminSession>()
        .ok_or_else(|| AppError::Unauthorized("Admin session required".to_string()))?;

    if !session.tier.includes(required) {
        return Err(AppError::Forbidden(format!(
            "{} access required",
            match required {
                AdminTier::Admin => "Admin",
                AdminTier::SuperAdmin => "Super admin",
            }
        )));
    }

    Ok(session.clone())
}

/// Admin or super-admin session
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireAdmin(session): RequireAdmin) { ... }
/// ```
pub struct RequireAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with_tier(parts, AdminTier::Admin).map(RequireAdmin)
    }
}

/// Super-admin session only
pub struct RequireSuperAdmin(pub AdminSession);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_with_tier(parts, AdminTier::SuperAdmin).map(RequireSuperAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(session: Option<AdminSession>) -> Parts {
        let (mut parts, _) = Request::new(()).into_parts();
        if let Some(session) = session {
            parts.extensions.insert(session);
        }
        parts
    }

    fn session(tier: AdminTier) -> AdminSession {
        AdminSession {
            tier,
            issued_at: 0,
            expires_at: 86_400,
        }
    }

    #[tokio::test]
    async fn test_admin_guard_accepts_both_tiers() {
        let mut parts = parts_with(Some(session(AdminTier::Admin)));
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());

        let mut parts = parts_with(Some(session(AdminTier::SuperAdmin)));
        assert!(RequireAdmin::from_request_parts(&mut parts, &()).await.is_ok());
    }

    #[tokio::test]
    async fn test_super_admin_guard_rejects_admin() {
        let mut parts = parts_with(Some(session(AdminTier::Admin)));
        let result = RequireSuperAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_guard_without_session() {
        let mut parts = parts_with(None);
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
