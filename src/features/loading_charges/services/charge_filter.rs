//! Conjunctive substring filtering over loading charges.
//!
//! Each active filter must be a case-insensitive substring of the record's
//! field text. Empty filter values are ignored. The location field is compared
//! by its display label, not its raw JSON.

use std::collections::HashMap;

use crate::core::error::{AppError, Result};
use crate::features::geo::models::Location;
use crate::features::loading_charges::models::LoadingCharge;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    TransactionId,
    UserId,
    DriverName,
    VehicleNumber,
    NetMass,
    Location,
    Material,
    Status,
    LoadingChainage,
}

impl FilterField {
    pub const ALL: [FilterField; 9] = [
        FilterField::TransactionId,
        FilterField::UserId,
        FilterField::DriverName,
        FilterField::VehicleNumber,
        FilterField::NetMass,
        FilterField::Location,
        FilterField::Material,
        FilterField::Status,
        FilterField::LoadingChainage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterField::TransactionId => "transaction_id",
            FilterField::UserId => "user_id",
            FilterField::DriverName => "driver_name",
            FilterField::VehicleNumber => "vehicle_number",
            FilterField::NetMass => "net_mass",
            FilterField::Location => "location",
            FilterField::Material => "material",
            FilterField::Status => "status",
            FilterField::LoadingChainage => "loading_chainage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Anything whose fields can be projected to text for filtering
pub trait Filterable {
    /// `None` when the record has no value for the field
    fn field_text(&self, field: FilterField) -> Option<String>;
}

impl Filterable for LoadingCharge {
    fn field_text(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::TransactionId => Some(self.transaction_id.to_string()),
            FilterField::UserId => Some(self.user_id.clone()),
            FilterField::DriverName => Some(self.driver_name.clone()),
            FilterField::VehicleNumber => Some(self.vehicle_number.clone()),
            FilterField::NetMass => Some(self.net_mass.clone()),
            FilterField::Location => {
                (!self.location.is_null()).then(|| Location::label(&self.location))
            }
            FilterField::Material => self.material.clone(),
            FilterField::Status => Some(self.status.clone()),
            FilterField::LoadingChainage => Some(self.loading_chainage.clone()),
        }
    }
}

/// Active filters, already lower-cased. Blank values are dropped on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChargeFilters {
    terms: Vec<(FilterField, String)>,
}

impl ChargeFilters {
    pub fn new<I, S>(filters: I) -> Self
    where
        I: IntoIterator<Item = (FilterField, S)>,
        S: AsRef<str>,
    {
        let terms = filters
            .into_iter()
            .filter_map(|(field, value)| {
                let value = value.as_ref();
                (!value.is_empty()).then(|| (field, value.to_lowercase()))
            })
            .collect();
        Self { terms }
    }

    /// Parse `name -> value` pairs, rejecting unknown field names
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let mut filters = Vec::with_capacity(params.len());
        for (name, value) in params {
            let field = FilterField::from_name(name).ok_or_else(|| {
                AppError::Validation(format!(
                    "Unknown filter field '{}'. Allowed: {}",
                    name,
                    FilterField::ALL.map(|f| f.name()).join(", ")
                ))
            })?;
            filters.push((field, value.as_str()));
        }
        Ok(Self::new(filters))
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        self.terms.iter().all(|(field, term)| {
            record
                .field_text(*field)
                .is_some_and(|text| text.to_lowercase().contains(term.as_str()))
        })
    }

    /// Matching records in their original order
    pub fn apply<R: Filterable>(&self, records: Vec<R>) -> Vec<R> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn charge(id: i64, driver: &str, location: serde_json::Value) -> LoadingCharge {
        LoadingCharge {
            transaction_id: id,
            transaction_uuid: Uuid::new_v4(),
            user_id: format!("user_{}", id),
            driver_name: driver.to_string(),
            vehicle_number: "UBA 123X".to_string(),
            loading_chainage: "28".to_string(),
            material: None,
            net_mass: "12 m³".to_string(),
            custom_transaction_id: None,
            location,
            offloading_destination: None,
            offloading_location: None,
            status: "In transit".to_string(),
            vehicle_photo: None,
            offloading_photo: None,
            distance_travelled: None,
            time_taken: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn drivers(records: &[LoadingCharge]) -> Vec<&str> {
        records.iter().map(|r| r.driver_name.as_str()).collect()
    }

    #[test]
    fn test_driver_name_substring() {
        let records = vec![charge(1, "John", json!(null)), charge(2, "Mary", json!(null))];
        let filters = ChargeFilters::new([(FilterField::DriverName, "jo")]);
        assert_eq!(drivers(&filters.apply(records)), vec!["John"]);
    }

    #[test]
    fn test_empty_filters_keep_everything_in_order() {
        let records = vec![
            charge(3, "Zed", json!(null)),
            charge(1, "Amy", json!(null)),
            charge(2, "Bob", json!(null)),
        ];
        let filters = ChargeFilters::new([(FilterField::DriverName, ""), (FilterField::Status, "")]);
        assert!(filters.is_empty());
        assert_eq!(drivers(&filters.apply(records)), vec!["Zed", "Amy", "Bob"]);
    }

    #[test]
    fn test_whitespace_is_matched_literally() {
        let records = vec![charge(1, "John Okello", json!(null)), charge(2, "Mary", json!(null))];
        let filters = ChargeFilters::new([(FilterField::DriverName, "n o")]);
        assert_eq!(drivers(&filters.apply(records.clone())), vec!["John Okello"]);

        let filters = ChargeFilters::new([(FilterField::DriverName, " ")]);
        assert_eq!(drivers(&filters.apply(records)), vec!["John Okello"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let records = vec![charge(11, "John", json!(null)), charge(12, "Johanna", json!(null))];
        let filters = ChargeFilters::new([
            (FilterField::DriverName, "JOH"),
            (FilterField::TransactionId, "12"),
        ]);
        assert_eq!(drivers(&filters.apply(records)), vec!["Johanna"]);
    }

    #[test]
    fn test_location_uses_display_name() {
        let records = vec![
            charge(1, "A", json!({"coordinates": "0.3, 32.5", "displayName": "Mukono Quarry"})),
            charge(2, "B", json!({"lat": 1.0, "lon": 2.0, "display_name": "Jinja"})),
            charge(3, "C", json!("Mukono town")),
        ];
        let filters = ChargeFilters::new([(FilterField::Location, "mukono")]);
        assert_eq!(drivers(&filters.apply(records)), vec!["A", "C"]);

        // raw JSON keys are not searchable
        let records = vec![charge(1, "A", json!({"coordinates": "0.3, 32.5", "displayName": "X"}))];
        let filters = ChargeFilters::new([(FilterField::Location, "coordinates")]);
        assert!(filters.apply(records).is_empty());
    }

    #[test]
    fn test_missing_value_does_not_match() {
        let records = vec![charge(1, "A", json!(null))];
        let filters = ChargeFilters::new([(FilterField::Material, "murrum")]);
        assert!(filters.apply(records.clone()).is_empty());

        let filters = ChargeFilters::new([(FilterField::Location, "x")]);
        assert!(filters.apply(records).is_empty());
    }

    #[test]
    fn test_from_params() {
        let mut params = HashMap::new();
        params.insert("driver_name".to_string(), "jo".to_string());
        params.insert("location".to_string(), "".to_string());
        let filters = ChargeFilters::from_params(&params).unwrap();
        assert_eq!(filters, ChargeFilters::new([(FilterField::DriverName, "jo")]));

        params.insert("colour".to_string(), "red".to_string());
        assert!(matches!(
            ChargeFilters::from_params(&params),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in FilterField::ALL {
            assert_eq!(FilterField::from_name(field.name()), Some(field));
        }
    }
}
