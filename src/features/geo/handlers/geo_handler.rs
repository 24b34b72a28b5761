use std::sync::Arc;

use axum::{
    extract::State,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::geo::dtos::{
    DistanceRequestDto, DistanceResponseDto, PlaceSearchQuery, PlaceSuggestionDto,
    ReverseGeocodeQuery,
};
use crate::features::geo::models::{CapturedLocation, Coordinates};
use crate::features::geo::services::{distance_between, format_distance, GeocodingService};
use crate::shared::types::{ApiResponse, Meta};

/// Distance between two locations
///
/// Accepts any stored location shape on either side. Unusable input yields 0.
#[utoipa::path(
    post,
    path = "/api/geo/distance",
    request_body = DistanceRequestDto,
    responses(
        (status = 200, description = "Distance computed", body = ApiResponse<DistanceResponseDto>),
        (status = 400, description = "Invalid request body")
    ),
    tag = "geo"
)]
pub async fn compute_distance(
    AppJson(dto): AppJson<DistanceRequestDto>,
) -> Result<Json<ApiResponse<DistanceResponseDto>>> {
    let distance_km = distance_between(&dto.from, &dto.to);

    Ok(Json(ApiResponse::success(
        Some(DistanceResponseDto {
            distance_km,
            formatted: format_distance(distance_km),
        }),
        None,
        None,
    )))
}

/// Reverse geocode a captured position
#[utoipa::path(
    get,
    path = "/api/geo/reverse",
    params(ReverseGeocodeQuery),
    responses(
        (status = 200, description = "Location described", body = ApiResponse<CapturedLocation>),
        (status = 400, description = "Invalid coordinates"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "geo",
    security(("bearer_auth" = []))
)]
pub async fn reverse_geocode(
    State(service): State<Arc<GeocodingService>>,
    AppQuery(query): AppQuery<ReverseGeocodeQuery>,
) -> Result<Json<ApiResponse<CapturedLocation>>> {
    query.validate()?;

    let point = Coordinates::new(query.lat, query.lon).ok_or_else(|| {
        AppError::Validation("Coordinates must be finite".to_string())
    })?;
    let captured = service.reverse_geocode(point).await;

    Ok(Json(ApiResponse::success(Some(captured), None, None)))
}

/// Search places for an offloading destination
#[utoipa::path(
    get,
    path = "/api/geo/search",
    params(PlaceSearchQuery),
    responses(
        (status = 200, description = "Matching places", body = ApiResponse<Vec<PlaceSuggestionDto>>),
        (status = 400, description = "Invalid search term"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Location service unavailable")
    ),
    tag = "geo",
    security(("bearer_auth" = []))
)]
pub async fn search_places(
    State(service): State<Arc<GeocodingService>>,
    AppQuery(query): AppQuery<PlaceSearchQuery>,
) -> Result<Json<ApiResponse<Vec<PlaceSuggestionDto>>>> {
    query.validate()?;

    let places = service.search_places(query.q.trim()).await?;
    let total = places.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(places),
        None,
        Some(Meta { total }),
    )))
}
