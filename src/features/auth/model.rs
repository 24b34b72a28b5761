use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Driver signed in through the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Identity-provider subject, used as `user_id` on records
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Password-gated admin tiers. The super-admin tier includes admin access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminTier {
    Admin,
    SuperAdmin,
}

impl AdminTier {
    pub fn includes(&self, required: AdminTier) -> bool {
        match required {
            AdminTier::Admin => true,
            AdminTier::SuperAdmin => *self == AdminTier::SuperAdmin,
        }
    }
}

impl std::fmt::Display for AdminTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminTier::Admin => write!(f, "admin"),
            AdminTier::SuperAdmin => write!(f, "super_admin"),
        }
    }
}

/// A verified admin session, inserted into request extensions
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminSession {
    pub tier: AdminTier,
    pub issued_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSessionClaims {
    pub iss: String,
    pub tier: AdminTier,
    pub iat: i64,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_hierarchy() {
        assert!(AdminTier::SuperAdmin.includes(AdminTier::Admin));
        assert!(AdminTier::SuperAdmin.includes(AdminTier::SuperAdmin));
        assert!(AdminTier::Admin.includes(AdminTier::Admin));
        assert!(!AdminTier::Admin.includes(AdminTier::SuperAdmin));
    }
}
