use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::geo::dtos::RoutePlanDto;
use crate::features::geo::models::{Coordinates, Location};
use crate::features::geo::services::{format_distance, format_duration};
use crate::features::loading_charges::models::{LoadingCharge, MaterialClass};
use crate::features::loading_charges::services::{ChargeStats, FormConstraints};

// =============================================================================
// FORM RULES
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FormRulesRequestDto {
    pub material: Option<String>,
    /// Registered capacity of the selected driver, if any
    pub cubic_meters: Option<f64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FormRulesResponseDto {
    /// `volumetric`, `quarry` or `other`
    pub material_class: String,
    pub mass_unit: String,
    pub mass_value: String,
    pub mass_locked: bool,
    pub chainage: String,
    pub chainage_locked: bool,
    pub transaction_id_editable: bool,
}

impl From<FormConstraints> for FormRulesResponseDto {
    fn from(c: FormConstraints) -> Self {
        let material_class = match c.material_class {
            MaterialClass::Volumetric => "volumetric",
            MaterialClass::Quarry => "quarry",
            MaterialClass::Other => "other",
        };

        Self {
            material_class: material_class.to_string(),
            mass_unit: c.mass_unit.symbol().to_string(),
            mass_value: c.mass_value,
            mass_locked: c.mass_locked,
            chainage: c.chainage,
            chainage_locked: c.chainage_locked,
            transaction_id_editable: c.transaction_id_editable,
        }
    }
}

// =============================================================================
// LIFECYCLE
// =============================================================================

/// Loading form submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLoadingChargeDto {
    /// Registered driver; name, plate and capacity are taken from the registry
    pub driver_id: Option<Uuid>,

    #[validate(length(max = 128, message = "Driver name must not exceed 128 characters"))]
    pub driver_name: Option<String>,

    #[validate(length(max = 20, message = "Vehicle number must not exceed 20 characters"))]
    pub vehicle_number: Option<String>,

    #[validate(length(max = 64, message = "Material must not exceed 64 characters"))]
    pub material: Option<String>,

    /// Mass or volume as entered; the unit follows from the material
    pub net_mass_value: Option<String>,

    #[validate(length(max = 64, message = "Chainage must not exceed 64 characters"))]
    pub loading_chainage: Option<String>,

    pub custom_transaction_id: Option<String>,

    /// Captured loading position in any supported location shape
    #[schema(value_type = Object)]
    pub location: Value,

    /// Destination picked before departure
    #[schema(value_type = Option<Object>)]
    pub offloading_destination: Option<Value>,

    /// Truck photo as a base64 image data URL
    #[validate(length(min = 1, message = "Please capture a truck photo before submitting."))]
    pub vehicle_photo: String,
}

/// Offloading confirmation
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OffloadDto {
    #[schema(value_type = Object)]
    pub offloading_location: Value,

    /// Delivery photo as a base64 image data URL
    #[validate(length(min = 1, message = "Please capture location and photo before confirming."))]
    pub offloading_photo: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoadingChargeDto {
    pub transaction_id: i64,
    pub transaction_uuid: Uuid,
    pub user_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub loading_chainage: String,
    pub material: Option<String>,
    pub net_mass: String,
    pub custom_transaction_id: Option<i64>,
    #[schema(value_type = Object)]
    pub location: Value,
    /// Display label of `location`
    pub location_label: String,
    #[schema(value_type = Option<Object>)]
    pub offloading_destination: Option<Value>,
    #[schema(value_type = Option<Object>)]
    pub offloading_location: Option<Value>,
    pub status: String,
    pub vehicle_photo: Option<String>,
    pub offloading_photo: Option<String>,
    /// Kilometers
    pub distance_travelled: Option<f64>,
    /// `"850 m"` / `"12.40 km"`
    pub distance_label: Option<String>,
    /// Minutes
    pub time_taken: Option<f64>,
    /// `"45 minutes"` / `"1h 5m"`
    pub time_taken_label: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LoadingCharge> for LoadingChargeDto {
    fn from(charge: LoadingCharge) -> Self {
        Self {
            location_label: Location::label(&charge.location),
            distance_label: charge.distance_travelled.map(format_distance),
            time_taken_label: charge.time_taken.map(format_duration),
            transaction_id: charge.transaction_id,
            transaction_uuid: charge.transaction_uuid,
            user_id: charge.user_id,
            driver_name: charge.driver_name,
            vehicle_number: charge.vehicle_number,
            loading_chainage: charge.loading_chainage,
            material: charge.material,
            net_mass: charge.net_mass,
            custom_transaction_id: charge.custom_transaction_id,
            location: charge.location,
            offloading_destination: charge.offloading_destination,
            offloading_location: charge.offloading_location,
            status: charge.status,
            vehicle_photo: charge.vehicle_photo,
            offloading_photo: charge.offloading_photo,
            distance_travelled: charge.distance_travelled,
            time_taken: charge.time_taken,
            created_at: charge.created_at,
            updated_at: charge.updated_at,
        }
    }
}

// =============================================================================
// MAP & ROUTE
// =============================================================================

/// A truck in transit, positioned at its loading location
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MapMarkerDto {
    pub transaction_uuid: Uuid,
    pub driver_name: String,
    pub vehicle_number: String,
    pub material: Option<String>,
    pub status: String,
    pub position: Coordinates,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Coordinates>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoutePreviewDto {
    pub from: Coordinates,
    pub to: Coordinates,
    /// Great-circle distance in kilometers
    pub straight_line_km: f64,
    pub route: RoutePlanDto,
}

// =============================================================================
// ADMIN
// =============================================================================

/// Filters accepted by the admin charge list. Every filter is a
/// case-insensitive substring; unknown parameters are rejected.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[allow(dead_code)]
pub struct ChargeListParams {
    #[param(minimum = 1)]
    pub page: Option<i64>,
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<i64>,
    pub transaction_id: Option<String>,
    pub user_id: Option<String>,
    pub driver_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub net_mass: Option<String>,
    /// Matched against the location's display name
    pub location: Option<String>,
    pub material: Option<String>,
    pub status: Option<String>,
    pub loading_chainage: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChargeStatsDto {
    pub total: i64,
    pub in_transit: i64,
    pub completed: i64,
    pub unique_drivers: i64,
}

impl From<ChargeStats> for ChargeStatsDto {
    fn from(stats: ChargeStats) -> Self {
        Self {
            total: stats.total,
            in_transit: stats.in_transit,
            completed: stats.completed,
            unique_drivers: stats.unique_drivers,
        }
    }
}
