use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::truck_drivers::models::TruckDriver;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TruckDriverDto {
    pub id: Uuid,
    pub driver_name: String,
    pub number_plate: String,
    pub cubic_meters: f64,
    pub contact: Option<String>,
    pub license_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TruckDriver> for TruckDriverDto {
    fn from(driver: TruckDriver) -> Self {
        Self {
            id: driver.id,
            driver_name: driver.driver_name,
            number_plate: driver.number_plate,
            cubic_meters: driver.cubic_meters,
            contact: driver.contact,
            license_photo_url: driver.license_photo_url,
            created_at: driver.created_at,
            updated_at: driver.updated_at,
        }
    }
}

/// Registration form fields
#[derive(Debug, Clone, Validate)]
pub struct CreateTruckDriverDto {
    #[validate(length(min = 1, max = 128, message = "Driver name must be 1-128 characters"))]
    pub driver_name: String,

    #[validate(
        length(min = 2, max = 20, message = "Number plate must be 2-20 characters"),
        regex(
            path = "*crate::shared::validation::NUMBER_PLATE_REGEX",
            message = "Number plate may only contain letters, digits, spaces and hyphens"
        )
    )]
    pub number_plate: String,

    #[validate(range(exclusive_min = 0.0, max = 1000.0, message = "Cubic meters must be a positive number"))]
    pub cubic_meters: f64,

    #[validate(regex(
        path = "*crate::shared::validation::CONTACT_REGEX",
        message = "Contact must be a phone number"
    ))]
    pub contact: String,
}

/// Edit form fields; absent fields keep their stored value
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateTruckDriverDto {
    #[validate(length(min = 1, max = 128, message = "Driver name must be 1-128 characters"))]
    pub driver_name: Option<String>,

    #[validate(
        length(min = 2, max = 20, message = "Number plate must be 2-20 characters"),
        regex(
            path = "*crate::shared::validation::NUMBER_PLATE_REGEX",
            message = "Number plate may only contain letters, digits, spaces and hyphens"
        )
    )]
    pub number_plate: Option<String>,

    #[validate(range(exclusive_min = 0.0, max = 1000.0, message = "Cubic meters must be a positive number"))]
    pub cubic_meters: Option<f64>,

    #[validate(regex(
        path = "*crate::shared::validation::CONTACT_REGEX",
        message = "Contact must be a phone number"
    ))]
    pub contact: Option<String>,
}

/// Multipart schema for the OpenAPI document
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct TruckDriverForm {
    pub driver_name: String,
    pub number_plate: String,
    pub cubic_meters: f64,
    pub contact: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub license_photo: Option<Vec<u8>>,
}
