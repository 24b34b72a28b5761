use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireSuperAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{SyncUserDto, UserListQuery, UserResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta};

#[utoipa::path(
    post,
    path = "/api/users/sync",
    request_body = SyncUserDto,
    responses(
        (status = 200, description = "Profile synced", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn sync_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<SyncUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    dto.validate()?;

    let profile = service.sync(&user, dto).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/super-admin/users",
    params(UserListQuery),
    responses(
        (status = 200, description = "Users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Super admin access required")
    ),
    tag = "super-admin",
    security(("admin_session" = []))
)]
pub async fn list_users(
    RequireSuperAdmin(_session): RequireSuperAdmin,
    State(service): State<Arc<UserService>>,
    AppQuery(query): AppQuery<UserListQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let (users, total) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    post,
    path = "/api/super-admin/users/{user_id}/toggle-block",
    params(("user_id" = String, Path, description = "Identity-provider subject")),
    responses(
        (status = 200, description = "Block flag toggled", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found"),
        (status = 403, description = "Super admin access required")
    ),
    tag = "super-admin",
    security(("admin_session" = []))
)]
pub async fn toggle_block(
    RequireSuperAdmin(_session): RequireSuperAdmin,
    State(service): State<Arc<UserService>>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = service.toggle_block(&user_id).await?;
    let message = if user.is_blocked {
        "User blocked"
    } else {
        "User unblocked"
    };

    Ok(Json(ApiResponse::success(
        Some(user),
        Some(message.to_string()),
        None,
    )))
}
