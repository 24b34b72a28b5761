use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a loading charge.
///
/// Created in transit; closed exactly once by offloading, after which no
/// column changes.
#[derive(Debug, Clone, FromRow)]
pub struct LoadingCharge {
    pub transaction_id: i64,
    pub transaction_uuid: Uuid,
    pub user_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub loading_chainage: String,
    pub material: Option<String>,
    /// `"{value} {unit}"`
    pub net_mass: String,
    pub custom_transaction_id: Option<i64>,
    /// Raw location shape as captured
    pub location: Value,
    pub offloading_destination: Option<Value>,
    pub offloading_location: Option<Value>,
    pub status: String,
    pub vehicle_photo: Option<String>,
    pub offloading_photo: Option<String>,
    /// Kilometers
    pub distance_travelled: Option<f64>,
    /// Minutes
    pub time_taken: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoadingCharge {
    pub fn is_completed(&self) -> bool {
        ChargeStatus::is_completed(&self.status)
    }
}

/// Conventional status values. The column is free text, so readers match loosely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    InTransit,
    Completed,
}

impl ChargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::InTransit => "In transit",
            ChargeStatus::Completed => "completed",
        }
    }

    pub fn is_in_transit(status: &str) -> bool {
        status.to_lowercase().contains("transit")
    }

    pub fn is_completed(status: &str) -> bool {
        let status = status.to_lowercase();
        status.contains("completed") || status.contains("delivered")
    }
}

/// Row data for a new charge, fully resolved and ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoadingCharge {
    pub transaction_uuid: Uuid,
    pub user_id: String,
    pub driver_name: String,
    pub vehicle_number: String,
    pub loading_chainage: String,
    pub material: String,
    pub net_mass: String,
    pub custom_transaction_id: Option<i64>,
    pub location: Value,
    pub offloading_destination: Option<Value>,
    pub status: ChargeStatus,
}
