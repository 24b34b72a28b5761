use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::features::auth::guards::{RequireAdmin, RequireSuperAdmin};
use crate::features::truck_drivers::dtos::{TruckDriverDto, TruckDriverForm};
use crate::features::truck_drivers::services::TruckDriverService;
use crate::shared::types::{ApiResponse, Meta};

use super::form::DriverFormFields;

/// Drivers offered on the loading form
#[utoipa::path(
    get,
    path = "/api/truck-drivers",
    responses(
        (status = 200, description = "Drivers ordered by name", body = ApiResponse<Vec<TruckDriverDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "truck-drivers",
    security(("bearer_auth" = []))
)]
pub async fn list_for_form(
    State(service): State<Arc<TruckDriverService>>,
) -> Result<Json<ApiResponse<Vec<TruckDriverDto>>>> {
    let drivers = service.list_for_form().await?;
    let total = drivers.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(drivers),
        None,
        Some(Meta { total }),
    )))
}

/// Register a truck driver
#[utoipa::path(
    post,
    path = "/api/admin/truck-drivers",
    request_body(content = TruckDriverForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Driver registered", body = ApiResponse<TruckDriverDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Number plate already registered")
    ),
    tag = "admin",
    security(("admin_session" = []))
)]
pub async fn register_driver(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<TruckDriverService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<TruckDriverDto>>)> {
    let (dto, photo) = DriverFormFields::read(multipart).await?.into_create()?;
    dto.validate()?;

    let driver = service.create(dto, photo).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(driver),
            Some("Truck driver saved successfully".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/super-admin/truck-drivers",
    responses(
        (status = 200, description = "Drivers, newest first", body = ApiResponse<Vec<TruckDriverDto>>),
        (status = 403, description = "Super admin access required")
    ),
    tag = "super-admin",
    security(("admin_session" = []))
)]
pub async fn list_all(
    RequireSuperAdmin(_session): RequireSuperAdmin,
    State(service): State<Arc<TruckDriverService>>,
) -> Result<Json<ApiResponse<Vec<TruckDriverDto>>>> {
    let drivers = service.list_all().await?;
    let total = drivers.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(drivers),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    put,
    path = "/api/super-admin/truck-drivers/{id}",
    params(("id" = Uuid, Path, description = "Truck driver id")),
    request_body(content = TruckDriverForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Driver updated", body = ApiResponse<TruckDriverDto>),
        (status = 404, description = "Driver not found"),
        (status = 409, description = "Number plate already registered")
    ),
    tag = "super-admin",
    security(("admin_session" = []))
)]
pub async fn update_driver(
    RequireSuperAdmin(_session): RequireSuperAdmin,
    State(service): State<Arc<TruckDriverService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TruckDriverDto>>> {
    let (dto, photo) = DriverFormFields::read(multipart).await?.into_update()?;
    dto.validate()?;

    let driver = service.update(id, dto, photo).await?;
    Ok(Json(ApiResponse::success(
        Some(driver),
        Some("Driver information updated.".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/super-admin/truck-drivers/{id}",
    params(("id" = Uuid, Path, description = "Truck driver id")),
    responses(
        (status = 200, description = "Driver and license photo removed"),
        (status = 404, description = "Driver not found")
    ),
    tag = "super-admin",
    security(("admin_session" = []))
)]
pub async fn delete_driver(
    RequireSuperAdmin(_session): RequireSuperAdmin,
    State(service): State<Arc<TruckDriverService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Driver deleted".to_string()),
        None,
    )))
}
