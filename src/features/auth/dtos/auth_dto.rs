use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AdminTier;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginDto {
    #[validate(length(min = 1, max = 256, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponseDto {
    /// Bearer token for the admin routes of this tier
    pub token: String,
    pub tier: AdminTier,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}
