use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{AdminLoginDto, AdminLoginResponseDto};
use crate::features::auth::model::AdminTier;
use crate::features::auth::services::AdminSessionService;
use crate::shared::types::ApiResponse;

/// Admin tier login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginDto,
    responses(
        (status = 200, description = "Session issued", body = ApiResponse<AdminLoginResponseDto>),
        (status = 401, description = "Invalid password")
    ),
    tag = "auth"
)]
pub async fn admin_login(
    State(service): State<Arc<AdminSessionService>>,
    AppJson(dto): AppJson<AdminLoginDto>,
) -> Result<Json<ApiResponse<AdminLoginResponseDto>>> {
    dto.validate()?;

    let session = service.login(AdminTier::Admin, &dto.password)?;
    Ok(Json(ApiResponse::success(
        Some(session),
        Some("Admin login successful".to_string()),
        None,
    )))
}

/// Super-admin tier login
#[utoipa::path(
    post,
    path = "/api/super-admin/login",
    request_body = AdminLoginDto,
    responses(
        (status = 200, description = "Session issued", body = ApiResponse<AdminLoginResponseDto>),
        (status = 401, description = "Invalid password")
    ),
    tag = "auth"
)]
pub async fn super_admin_login(
    State(service): State<Arc<AdminSessionService>>,
    AppJson(dto): AppJson<AdminLoginDto>,
) -> Result<Json<ApiResponse<AdminLoginResponseDto>>> {
    dto.validate()?;

    let session = service.login(AdminTier::SuperAdmin, &dto.password)?;
    Ok(Json(ApiResponse::success(
        Some(session),
        Some("Super admin login successful".to_string()),
        None,
    )))
}
