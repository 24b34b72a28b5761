use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Two raw locations in any of the stored shapes
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DistanceRequestDto {
    #[schema(value_type = Object)]
    pub from: Value,
    #[schema(value_type = Object)]
    pub to: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DistanceResponseDto {
    /// Great-circle distance, rounded to two decimals. 0 when either side is unusable.
    pub distance_km: f64,
    /// `"850 m"` or `"12.34 km"`
    pub formatted: String,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct ReverseGeocodeQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
pub struct PlaceSearchQuery {
    /// Free-text place name
    #[validate(length(min = 2, max = 200, message = "Search term must be 2-200 characters"))]
    pub q: String,
}

/// Destination candidate from place search
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceSuggestionDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

/// Driving route between two points
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoutePlanDto {
    /// Encoded polyline of the full route
    pub geometry: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Turn-by-turn instructions in travel order
    pub steps: Vec<String>,
}
