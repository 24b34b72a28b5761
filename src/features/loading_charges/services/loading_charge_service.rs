use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::geo::models::{normalize, Location};
use crate::features::geo::services::{distance_between, distance_km, elapsed_minutes, RoutingService};
use crate::features::loading_charges::dtos::{
    CreateLoadingChargeDto, LoadingChargeDto, MapMarkerDto, OffloadDto, RoutePreviewDto,
};
use crate::features::loading_charges::models::{ChargeStatus, LoadingCharge, NewLoadingCharge};
use crate::features::truck_drivers::TruckDriverService;
use crate::features::users::UserService;
use crate::modules::storage::{MinIOClient, Photo};
use crate::shared::constants::{OFFLOADING_PHOTO_FOLDER, VEHICLE_PHOTO_FOLDER};
use crate::shared::types::PaginationQuery;

use super::charge_filter::ChargeFilters;
use super::charge_stats::ChargeStats;
use super::form_rules::{derive_constraints, resolve_submission, SubmittedFields};

/// Driver and vehicle a charge is recorded against
#[derive(Debug, Clone, PartialEq)]
pub struct DriverIdentity {
    pub driver_name: String,
    pub vehicle_number: String,
    /// Registered capacity in cubic meters; `None` for unregistered drivers
    pub capacity: Option<f64>,
}

impl DriverIdentity {
    /// Identity typed into the form when no registered driver was picked
    fn from_submission(dto: &CreateLoadingChargeDto) -> Result<Self> {
        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        match (field(&dto.driver_name), field(&dto.vehicle_number)) {
            (Some(driver_name), Some(vehicle_number)) => Ok(Self {
                driver_name,
                vehicle_number,
                capacity: None,
            }),
            _ => Err(AppError::Validation(
                "Driver name and vehicle number are required".to_string(),
            )),
        }
    }
}

/// Resolve a loading form submission into an insertable row.
///
/// Dependent fields are re-derived from the material and the driver's
/// capacity, so locked values sent by the client are ignored.
pub fn build_new_charge(
    user_id: &str,
    driver: DriverIdentity,
    dto: &CreateLoadingChargeDto,
    transaction_uuid: Uuid,
) -> Result<NewLoadingCharge> {
    if normalize(&dto.location).is_none() {
        return Err(AppError::Validation(
            "Location must be captured before submitting.".to_string(),
        ));
    }

    let constraints = derive_constraints(dto.material.as_deref(), driver.capacity);
    let resolved = resolve_submission(
        SubmittedFields {
            material: dto.material.as_deref(),
            net_mass_value: dto.net_mass_value.as_deref(),
            loading_chainage: dto.loading_chainage.as_deref(),
            custom_transaction_id: dto.custom_transaction_id.as_deref(),
        },
        &constraints,
    )?;

    Ok(NewLoadingCharge {
        transaction_uuid,
        user_id: user_id.to_string(),
        driver_name: driver.driver_name,
        vehicle_number: driver.vehicle_number,
        loading_chainage: resolved.loading_chainage,
        material: resolved.material,
        net_mass: resolved.net_mass,
        custom_transaction_id: resolved.custom_transaction_id,
        location: dto.location.clone(),
        offloading_destination: dto
            .offloading_destination
            .clone()
            .filter(|d| !d.is_null()),
        status: ChargeStatus::InTransit,
    })
}

/// Map marker for an in-transit charge, or `None` when its location is unusable
pub fn map_marker(charge: &LoadingCharge) -> Option<MapMarkerDto> {
    let Some(position) = normalize(&charge.location) else {
        tracing::debug!(
            "Skipping marker for {}: location could not be normalized",
            charge.transaction_uuid
        );
        return None;
    };

    Some(MapMarkerDto {
        transaction_uuid: charge.transaction_uuid,
        driver_name: charge.driver_name.clone(),
        vehicle_number: charge.vehicle_number.clone(),
        material: charge.material.clone(),
        status: charge.status.clone(),
        position,
        label: Location::label(&charge.location),
        destination: charge.offloading_destination.as_ref().and_then(normalize),
        created_at: charge.created_at,
    })
}

/// Lifecycle of loading charges: creation, transit, offloading
pub struct LoadingChargeService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    drivers: Arc<TruckDriverService>,
    users: Arc<UserService>,
    routing: Arc<RoutingService>,
}

impl LoadingChargeService {
    pub fn new(
        pool: PgPool,
        storage: Arc<MinIOClient>,
        drivers: Arc<TruckDriverService>,
        users: Arc<UserService>,
        routing: Arc<RoutingService>,
    ) -> Self {
        Self {
            pool,
            storage,
            drivers,
            users,
            routing,
        }
    }

    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateLoadingChargeDto,
    ) -> Result<LoadingChargeDto> {
        self.users.ensure_not_blocked(&user.sub).await?;

        let driver = match dto.driver_id {
            Some(id) => {
                let registered = self.drivers.get(id).await?;
                DriverIdentity {
                    driver_name: registered.driver_name,
                    vehicle_number: registered.number_plate,
                    capacity: Some(registered.cubic_meters),
                }
            }
            None => DriverIdentity::from_submission(&dto)?,
        };

        let new_charge = build_new_charge(&user.sub, driver, &dto, Uuid::now_v7())?;
        let photo = Photo::from_data_url(&dto.vehicle_photo)?;
        let photo_url = self.storage.upload_photo(VEHICLE_PHOTO_FOLDER, photo).await?;

        let inserted = sqlx::query_as::<_, LoadingCharge>(
            r#"
            INSERT INTO loading_charge (
                transaction_uuid, user_id, driver_name, vehicle_number, loading_chainage,
                material, net_mass, custom_transaction_id, location, offloading_destination,
                status, vehicle_photo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(new_charge.transaction_uuid)
        .bind(&new_charge.user_id)
        .bind(&new_charge.driver_name)
        .bind(&new_charge.vehicle_number)
        .bind(&new_charge.loading_chainage)
        .bind(&new_charge.material)
        .bind(&new_charge.net_mass)
        .bind(new_charge.custom_transaction_id)
        .bind(&new_charge.location)
        .bind(new_charge.offloading_destination.as_ref())
        .bind(new_charge.status.as_str())
        .bind(&photo_url)
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(charge) => {
                tracing::info!(
                    "Loading charge created: uuid={}, driver={}, material={:?}",
                    charge.transaction_uuid,
                    charge.driver_name,
                    charge.material
                );
                Ok(charge.into())
            }
            Err(e) => {
                tracing::error!("Failed to create loading charge: {:?}", e);
                self.discard_photo(&photo_url).await;
                Err(AppError::Database(e))
            }
        }
    }

    async fn find(&self, transaction_uuid: Uuid) -> Result<Option<LoadingCharge>> {
        let row = sqlx::query_as::<_, LoadingCharge>(
            "SELECT * FROM loading_charge WHERE transaction_uuid = $1",
        )
        .bind(transaction_uuid)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get(&self, transaction_uuid: Uuid) -> Result<LoadingCharge> {
        self.find(transaction_uuid).await?.ok_or_else(|| {
            AppError::NotFound(format!("Loading charge {} not found", transaction_uuid))
        })
    }

    pub async fn get_by_uuid(&self, transaction_uuid: Uuid) -> Result<LoadingChargeDto> {
        Ok(self.get(transaction_uuid).await?.into())
    }

    async fn fetch_in_transit(&self) -> Result<Vec<LoadingCharge>> {
        let rows = sqlx::query_as::<_, LoadingCharge>(
            "SELECT * FROM loading_charge WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(ChargeStatus::InTransit.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list in-transit charges: {:?}", e);
            AppError::Database(e)
        })?;
        Ok(rows)
    }

    /// Open charges, newest first
    pub async fn list_in_transit(&self) -> Result<Vec<LoadingChargeDto>> {
        Ok(self
            .fetch_in_transit()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Markers for the live transit map; charges without a usable location are left off
    pub async fn map_markers(&self) -> Result<Vec<MapMarkerDto>> {
        let charges = self.fetch_in_transit().await?;
        Ok(charges.iter().filter_map(map_marker).collect())
    }

    /// Admin listing: substring filters, then pagination. Returns the page and
    /// the filtered total.
    pub async fn list_filtered(
        &self,
        filters: &ChargeFilters,
        pagination: &PaginationQuery,
    ) -> Result<(Vec<LoadingChargeDto>, i64)> {
        let rows = sqlx::query_as::<_, LoadingCharge>(
            "SELECT * FROM loading_charge ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list loading charges: {:?}", e);
            AppError::Database(e)
        })?;

        let matching = filters.apply(rows);
        let total = matching.len() as i64;
        let page = pagination
            .paginate(matching)
            .into_iter()
            .map(Into::into)
            .collect();

        Ok((page, total))
    }

    pub async fn stats(&self) -> Result<ChargeStats> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT status, driver_name FROM loading_charge")
                .fetch_all(&self.pool)
                .await?;

        Ok(ChargeStats::tally(
            rows.iter().map(|(s, d)| (s.as_str(), d.as_str())),
        ))
    }

    /// Close a charge. Happens at most once; a second confirmation is a conflict.
    pub async fn confirm_offloading(
        &self,
        user: &AuthenticatedUser,
        transaction_uuid: Uuid,
        dto: OffloadDto,
    ) -> Result<LoadingChargeDto> {
        self.users.ensure_not_blocked(&user.sub).await?;

        if dto.offloading_location.is_null() {
            return Err(AppError::Validation(
                "Please capture location and photo before confirming.".to_string(),
            ));
        }

        let charge = self.get(transaction_uuid).await?;
        ensure_open(&charge)?;

        let distance = distance_between(&charge.location, &dto.offloading_location);
        let time_taken = elapsed_minutes(charge.created_at, Utc::now());

        let photo = Photo::from_data_url(&dto.offloading_photo)?;
        let photo_url = self
            .storage
            .upload_photo(OFFLOADING_PHOTO_FOLDER, photo)
            .await?;

        let updated = sqlx::query_as::<_, LoadingCharge>(
            r#"
            UPDATE loading_charge
            SET status = $2,
                offloading_location = $3,
                offloading_photo = $4,
                distance_travelled = $5,
                time_taken = $6,
                updated_at = NOW()
            WHERE transaction_uuid = $1 AND status <> $2
            RETURNING *
            "#,
        )
        .bind(transaction_uuid)
        .bind(ChargeStatus::Completed.as_str())
        .bind(&dto.offloading_location)
        .bind(&photo_url)
        .bind(distance)
        .bind(time_taken)
        .fetch_optional(&self.pool)
        .await;

        match updated {
            Ok(Some(charge)) => {
                tracing::info!(
                    "Offloading confirmed: uuid={}, distance={:.2}km, minutes={:.1}",
                    transaction_uuid,
                    distance,
                    time_taken
                );
                Ok(charge.into())
            }
            Ok(None) => {
                // Lost the race to another confirmation
                self.discard_photo(&photo_url).await;
                Err(already_offloaded(transaction_uuid))
            }
            Err(e) => {
                tracing::error!("Failed to confirm offloading: {:?}", e);
                self.discard_photo(&photo_url).await;
                Err(AppError::Database(e))
            }
        }
    }

    /// Driving route from the loading location to the chosen destination
    pub async fn route_preview(&self, transaction_uuid: Uuid) -> Result<RoutePreviewDto> {
        let charge = self.get(transaction_uuid).await?;

        let from = normalize(&charge.location).ok_or_else(|| {
            AppError::BadRequest("Loading location has no usable coordinates".to_string())
        })?;
        let to = charge
            .offloading_destination
            .as_ref()
            .and_then(normalize)
            .ok_or_else(|| {
                AppError::BadRequest("No offloading destination was set for this charge".to_string())
            })?;

        let route = self.routing.fetch_route(from, to).await?;

        Ok(RoutePreviewDto {
            from,
            to,
            straight_line_km: distance_km(from, to),
            route,
        })
    }

    async fn discard_photo(&self, url: &str) {
        if let Err(e) = self.storage.delete_by_url(url).await {
            tracing::warn!("Failed to remove orphaned photo {}: {}", url, e);
        }
    }
}

/// Only a charge that is still open can be offloaded
fn ensure_open(charge: &LoadingCharge) -> Result<()> {
    if charge.is_completed() {
        return Err(already_offloaded(charge.transaction_uuid));
    }
    Ok(())
}

fn already_offloaded(transaction_uuid: Uuid) -> AppError {
    AppError::Conflict(format!(
        "Loading charge {} has already been offloaded",
        transaction_uuid
    ))
}

/// Split the admin query string into filters and pagination
pub fn split_list_params(
    mut params: HashMap<String, String>,
) -> Result<(ChargeFilters, PaginationQuery)> {
    let mut pagination = PaginationQuery::default();

    if let Some(page) = params.remove("page") {
        pagination.page = parse_positive(&page, "page")?;
    }
    if let Some(page_size) = params.remove("page_size") {
        pagination.page_size = parse_positive(&page_size, "page_size")?;
    }

    Ok((ChargeFilters::from_params(&params)?, pagination))
}

fn parse_positive(value: &str, name: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| AppError::Validation(format!("{} must be a positive integer", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn submission(material: &str) -> CreateLoadingChargeDto {
        CreateLoadingChargeDto {
            driver_id: None,
            driver_name: Some("John Okello".to_string()),
            vehicle_number: Some("UBA 123X".to_string()),
            material: Some(material.to_string()),
            net_mass_value: Some("18.50".to_string()),
            loading_chainage: Some("14+200".to_string()),
            custom_transaction_id: Some("40512".to_string()),
            location: json!({"coordinates": "0.3476, 32.5825", "displayName": "Kampala"}),
            offloading_destination: Some(json!({"lat": "0.4244", "lon": "33.2042", "display_name": "Jinja"})),
            vehicle_photo: "data:image/jpeg;base64,/9j/4AAQ".to_string(),
        }
    }

    fn unregistered() -> DriverIdentity {
        DriverIdentity {
            driver_name: "John Okello".to_string(),
            vehicle_number: "UBA 123X".to_string(),
            capacity: None,
        }
    }

    #[test]
    fn test_aggregate_submission_resolves_quarry_fields() {
        let uuid = Uuid::now_v7();
        let charge = build_new_charge("user_1", unregistered(), &submission("aggregate"), uuid)
            .unwrap();

        assert_eq!(charge.loading_chainage, "28");
        assert_eq!(charge.custom_transaction_id, Some(40512));
        assert_eq!(charge.status, ChargeStatus::InTransit);
        assert_eq!(charge.status.as_str(), "In transit");
        assert_eq!(charge.net_mass, "18.5 tonnes");
        assert_eq!(charge.transaction_uuid, uuid);
        assert!(charge.offloading_destination.is_some());
    }

    #[test]
    fn test_volumetric_submission_uses_registered_capacity() {
        let driver = DriverIdentity {
            capacity: Some(12.0),
            ..unregistered()
        };
        let charge =
            build_new_charge("user_1", driver, &submission("murrum"), Uuid::now_v7()).unwrap();

        assert_eq!(charge.net_mass, "12 m³");
        assert_eq!(charge.loading_chainage, "14+200");
        assert_eq!(charge.custom_transaction_id, None);
    }

    #[test]
    fn test_submission_without_usable_location_is_rejected() {
        let mut dto = submission("aggregate");
        dto.location = json!("somewhere near the quarry");

        let err = build_new_charge("user_1", unregistered(), &dto, Uuid::now_v7()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_null_destination_is_dropped() {
        let mut dto = submission("hardcore");
        dto.offloading_destination = Some(Value::Null);

        let charge = build_new_charge("user_1", unregistered(), &dto, Uuid::now_v7()).unwrap();
        assert_eq!(charge.offloading_destination, None);
    }

    #[test]
    fn test_identity_from_submission_requires_both_fields() {
        let mut dto = submission("aggregate");
        assert!(DriverIdentity::from_submission(&dto).is_ok());

        dto.vehicle_number = Some("  ".to_string());
        assert!(DriverIdentity::from_submission(&dto).is_err());
    }

    fn charge_at(location: Value) -> LoadingCharge {
        let created = Utc.with_ymd_and_hms(2025, 10, 1, 8, 0, 0).unwrap();
        LoadingCharge {
            transaction_id: 1,
            transaction_uuid: Uuid::now_v7(),
            user_id: "user_1".into(),
            driver_name: "Mary Achieng".into(),
            vehicle_number: "UBB 456Y".into(),
            loading_chainage: "28".into(),
            material: Some("aggregate".into()),
            net_mass: "20 tonnes".into(),
            custom_transaction_id: Some(7),
            location,
            offloading_destination: Some(json!({"lat": 0.5, "lon": 32.6})),
            offloading_location: None,
            status: "In transit".into(),
            vehicle_photo: None,
            offloading_photo: None,
            distance_travelled: None,
            time_taken: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_map_marker_skips_malformed_locations() {
        assert!(map_marker(&charge_at(json!({"coordinates": "not,numbers"}))).is_none());

        let marker = map_marker(&charge_at(json!({"lat": "1.5", "lon": "32.5"}))).unwrap();
        assert_eq!(marker.position.lat, 1.5);
        assert_eq!(marker.position.lon, 32.5);
        assert_eq!(marker.destination.map(|d| d.lat), Some(0.5));
    }

    #[test]
    fn test_offloading_allowed_once() {
        let mut charge = charge_at(json!({"lat": "1.5", "lon": "32.5"}));
        assert!(ensure_open(&charge).is_ok());

        charge.status = "completed".into();
        assert!(matches!(ensure_open(&charge), Err(AppError::Conflict(_))));

        charge.status = "Delivered".into();
        assert!(matches!(ensure_open(&charge), Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_split_list_params() {
        let params = HashMap::from([
            ("page".to_string(), "2".to_string()),
            ("page_size".to_string(), "5".to_string()),
            ("driver_name".to_string(), "jo".to_string()),
        ]);
        let (filters, pagination) = split_list_params(params).unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.page_size, 5);
        assert!(!filters.is_empty());

        let huge = HashMap::from([("page".to_string(), i64::MAX.to_string())]);
        let (_, pagination) = split_list_params(huge).unwrap();
        assert!(pagination.offset() >= 0);

        let bad = HashMap::from([("page".to_string(), "zero".to_string())]);
        assert!(split_list_params(bad).is_err());

        let unknown = HashMap::from([("colour".to_string(), "red".to_string())]);
        assert!(matches!(
            split_list_params(unknown),
            Err(AppError::Validation(_))
        ));
    }
}
