use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::loading_charges::dtos::{
    ChargeListParams, ChargeStatsDto, CreateLoadingChargeDto, FormRulesRequestDto,
    FormRulesResponseDto, LoadingChargeDto, MapMarkerDto, OffloadDto, RoutePreviewDto,
};
use crate::features::loading_charges::services::{
    derive_constraints, split_list_params, LoadingChargeService,
};
use crate::shared::types::{ApiResponse, Meta};

/// Dependent loading-form fields for a material and driver capacity
#[utoipa::path(
    post,
    path = "/api/loading-charges/form-rules",
    request_body = FormRulesRequestDto,
    responses(
        (status = 200, description = "Derived field rules", body = ApiResponse<FormRulesResponseDto>),
        (status = 400, description = "Invalid body")
    ),
    tag = "loading-charges"
)]
pub async fn form_rules(
    AppJson(dto): AppJson<FormRulesRequestDto>,
) -> Result<Json<ApiResponse<FormRulesResponseDto>>> {
    let constraints = derive_constraints(dto.material.as_deref(), dto.cubic_meters);
    Ok(Json(ApiResponse::success(
        Some(constraints.into()),
        None,
        None,
    )))
}

/// Record a truck loading
#[utoipa::path(
    post,
    path = "/api/loading-charges",
    request_body = CreateLoadingChargeDto,
    responses(
        (status = 201, description = "Loading charge created", body = ApiResponse<LoadingChargeDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account blocked"),
        (status = 404, description = "Selected driver not found")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn create_charge(
    user: AuthenticatedUser,
    State(service): State<Arc<LoadingChargeService>>,
    AppJson(dto): AppJson<CreateLoadingChargeDto>,
) -> Result<(StatusCode, Json<ApiResponse<LoadingChargeDto>>)> {
    dto.validate()?;

    let charge = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(charge),
            Some("Loading charge created successfully!".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/loading-charges/in-transit",
    responses(
        (status = 200, description = "Open charges, newest first", body = ApiResponse<Vec<LoadingChargeDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn list_in_transit(
    State(service): State<Arc<LoadingChargeService>>,
) -> Result<Json<ApiResponse<Vec<LoadingChargeDto>>>> {
    let charges = service.list_in_transit().await?;
    let total = charges.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(charges),
        None,
        Some(Meta { total }),
    )))
}

/// Trucks in transit for the live map
#[utoipa::path(
    get,
    path = "/api/loading-charges/map",
    responses(
        (status = 200, description = "Map markers", body = ApiResponse<Vec<MapMarkerDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn map_markers(
    State(service): State<Arc<LoadingChargeService>>,
) -> Result<Json<ApiResponse<Vec<MapMarkerDto>>>> {
    let markers = service.map_markers().await?;
    let total = markers.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(markers),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/loading-charges/{uuid}",
    params(("uuid" = Uuid, Path, description = "Transaction UUID")),
    responses(
        (status = 200, description = "Loading charge", body = ApiResponse<LoadingChargeDto>),
        (status = 404, description = "Not found")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn get_charge(
    State(service): State<Arc<LoadingChargeService>>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ApiResponse<LoadingChargeDto>>> {
    let charge = service.get_by_uuid(uuid).await?;
    Ok(Json(ApiResponse::success(Some(charge), None, None)))
}

/// Driving route from the loading point to the chosen destination
#[utoipa::path(
    get,
    path = "/api/loading-charges/{uuid}/route",
    params(("uuid" = Uuid, Path, description = "Transaction UUID")),
    responses(
        (status = 200, description = "Route preview", body = ApiResponse<RoutePreviewDto>),
        (status = 400, description = "No usable destination"),
        (status = 404, description = "Not found"),
        (status = 502, description = "Directions service failed")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn route_preview(
    State(service): State<Arc<LoadingChargeService>>,
    Path(uuid): Path<Uuid>,
) -> Result<Json<ApiResponse<RoutePreviewDto>>> {
    let preview = service.route_preview(uuid).await?;
    Ok(Json(ApiResponse::success(Some(preview), None, None)))
}

/// Confirm delivery and close the charge
#[utoipa::path(
    post,
    path = "/api/loading-charges/{uuid}/offload",
    params(("uuid" = Uuid, Path, description = "Transaction UUID")),
    request_body = OffloadDto,
    responses(
        (status = 200, description = "Offloading confirmed", body = ApiResponse<LoadingChargeDto>),
        (status = 400, description = "Location or photo missing"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already offloaded")
    ),
    tag = "loading-charges",
    security(("bearer_auth" = []))
)]
pub async fn confirm_offloading(
    user: AuthenticatedUser,
    State(service): State<Arc<LoadingChargeService>>,
    Path(uuid): Path<Uuid>,
    AppJson(dto): AppJson<OffloadDto>,
) -> Result<Json<ApiResponse<LoadingChargeDto>>> {
    dto.validate()?;

    let charge = service.confirm_offloading(&user, uuid, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(charge),
        Some("Offloading confirmed!".to_string()),
        None,
    )))
}

/// All charges with per-field substring filters
#[utoipa::path(
    get,
    path = "/api/admin/loading-charges",
    params(ChargeListParams),
    responses(
        (status = 200, description = "Filtered charges", body = ApiResponse<Vec<LoadingChargeDto>>),
        (status = 400, description = "Unknown filter field"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("admin_session" = []))
)]
pub async fn admin_list(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<LoadingChargeService>>,
    AppQuery(params): AppQuery<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Vec<LoadingChargeDto>>>> {
    let (filters, pagination) = split_list_params(params)?;

    let (charges, total) = service.list_filtered(&filters, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(charges),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Fleet statistics", body = ApiResponse<ChargeStatsDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "admin",
    security(("admin_session" = []))
)]
pub async fn admin_stats(
    RequireAdmin(_session): RequireAdmin,
    State(service): State<Arc<LoadingChargeService>>,
) -> Result<Json<ApiResponse<ChargeStatsDto>>> {
    let stats = service.stats().await?;
    Ok(Json(ApiResponse::success(Some(stats.into()), None, None)))
}
