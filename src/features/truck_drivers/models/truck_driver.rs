use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a registered truck and its driver
#[derive(Debug, Clone, FromRow)]
pub struct TruckDriver {
    pub id: Uuid,
    pub driver_name: String,
    pub number_plate: String,
    /// Registered cargo capacity in cubic meters
    pub cubic_meters: f64,
    pub contact: Option<String>,
    pub license_photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
