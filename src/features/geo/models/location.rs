//! Location shapes found in stored records and client submissions.
//!
//! Three conventions coexist in the data:
//!
//! | Shape | Origin |
//! |-------|--------|
//! | `{"lat": .., "lon": .., "display_name": ..}` | place search results, destinations |
//! | `{"coordinates": "lat, lon", "displayName": .., "address": {..}}` | device captures |
//! | `"Some display string"` | free-text labels |
//!
//! Records keep the raw JSON; [`Location`] classifies it and [`normalize`]
//! turns it into [`Coordinates`] at the point of use.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// Object with `lat`/`lon` fields. Either may be a JSON number or a numeric string.
    /// A `coordinates` string carried alongside is kept as a fallback.
    LatLon {
        lat: Value,
        lon: Value,
        fallback: Option<String>,
        display_name: Option<String>,
    },
    /// Object with a `"lat,lon"` string under `coordinates`
    Captured {
        coordinates: String,
        display_name: Option<String>,
    },
    /// Bare display string
    Label(String),
    Unrecognized,
}

impl Location {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(label) => Location::Label(label.clone()),
            Value::Object(map) => {
                let display_name = map
                    .get("displayName")
                    .or_else(|| map.get("display_name"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let coordinates = map
                    .get("coordinates")
                    .and_then(Value::as_str)
                    .map(str::to_string);

                match (map.get("lat"), map.get("lon")) {
                    (Some(lat), Some(lon)) => Location::LatLon {
                        lat: lat.clone(),
                        lon: lon.clone(),
                        fallback: coordinates,
                        display_name,
                    },
                    _ => match coordinates {
                        Some(coordinates) => Location::Captured {
                            coordinates,
                            display_name,
                        },
                        None => Location::Unrecognized,
                    },
                }
            }
            _ => Location::Unrecognized,
        }
    }

    /// Canonical point, or `None` when the shape carries no parseable position
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            Location::LatLon {
                lat, lon, fallback, ..
            } => numeric(lat)
                .zip(numeric(lon))
                .and_then(|(lat, lon)| Coordinates::new(lat, lon))
                .or_else(|| fallback.as_deref().and_then(Coordinates::parse_pair)),
            Location::Captured { coordinates, .. } => Coordinates::parse_pair(coordinates),
            Location::Label(_) | Location::Unrecognized => None,
        }
    }

    pub fn display_name(&self) -> Option<&str> {
        match self {
            Location::LatLon { display_name, .. } | Location::Captured { display_name, .. } => {
                display_name.as_deref()
            }
            Location::Label(label) => Some(label),
            Location::Unrecognized => None,
        }
    }

    /// Human-readable projection used for searching and listing: the display
    /// name, else the coordinate pair, else the raw JSON text.
    pub fn label(value: &Value) -> String {
        let location = Location::from_value(value);
        if let Some(name) = location.display_name() {
            return name.to_string();
        }
        match location.coordinates() {
            Some(point) => point.to_pair_string(),
            None => value.to_string(),
        }
    }
}

/// Normalize any stored location shape into coordinates.
///
/// Returns `None` for absent or malformed data so batch callers can skip the
/// record instead of failing.
pub fn normalize(value: &Value) -> Option<Coordinates> {
    Location::from_value(value).coordinates()
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// A position captured on a device, in the shape the client stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapturedLocation {
    pub address: CapturedAddress,
    /// `"lat, lon"`
    pub coordinates: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CapturedAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(rename = "ISO3166-2-lvl3", skip_serializing_if = "Option::is_none")]
    pub iso3166_2_lvl3: Option<String>,
    #[serde(rename = "ISO3166-2-lvl4", skip_serializing_if = "Option::is_none")]
    pub iso3166_2_lvl4: Option<String>,
}

impl CapturedLocation {
    /// Capture with no place information
    pub fn bare(point: Coordinates) -> Self {
        Self {
            address: CapturedAddress::default(),
            coordinates: point.to_pair_string(),
            display_name: point.to_label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_lat_lon_strings() {
        let point = normalize(&json!({"lat": "1.5", "lon": "32.5"}));
        assert_eq!(point, Some(Coordinates { lat: 1.5, lon: 32.5 }));
    }

    #[test]
    fn test_normalize_lat_lon_numbers() {
        let point = normalize(&json!({"lat": 0.0, "lon": 32.58, "display_name": "Kampala"}));
        assert_eq!(point, Some(Coordinates { lat: 0.0, lon: 32.58 }));
    }

    #[test]
    fn test_normalize_coordinates_string() {
        let point = normalize(&json!({"coordinates": "1.5,32.5"}));
        assert_eq!(point, Some(Coordinates { lat: 1.5, lon: 32.5 }));
    }

    #[test]
    fn test_normalize_failures() {
        assert_eq!(normalize(&json!({"coordinates": "not,numbers"})), None);
        assert_eq!(normalize(&json!("a plain string")), None);
        assert_eq!(normalize(&json!(null)), None);
        assert_eq!(normalize(&json!({"lat": "1.5"})), None);
        assert_eq!(normalize(&json!([1.5, 32.5])), None);
        assert_eq!(normalize(&json!({"lat": true, "lon": "x"})), None);
    }

    #[test]
    fn test_dual_representation_prefers_lat_lon() {
        let value = json!({"lat": "2.0", "lon": "30.0", "coordinates": "1.5, 32.5"});
        assert_eq!(normalize(&value), Some(Coordinates { lat: 2.0, lon: 30.0 }));
    }

    #[test]
    fn test_dual_representation_falls_back_to_coordinates() {
        let value = json!({"lat": "", "lon": "oops", "coordinates": "1.5, 32.5"});
        assert_eq!(normalize(&value), Some(Coordinates { lat: 1.5, lon: 32.5 }));
    }

    #[test]
    fn test_label_projection() {
        assert_eq!(
            Location::label(&json!({"coordinates": "1.5, 32.5", "displayName": "Mukono"})),
            "Mukono"
        );
        assert_eq!(
            Location::label(&json!({"lat": 1.5, "lon": 32.5, "display_name": "Jinja"})),
            "Jinja"
        );
        assert_eq!(Location::label(&json!("Quarry gate")), "Quarry gate");
        assert_eq!(Location::label(&json!({"coordinates": "1.5,32.5"})), "1.5, 32.5");
    }

    #[test]
    fn test_captured_location_wire_shape() {
        let captured = CapturedLocation::bare(Coordinates { lat: 1.5, lon: 32.5 });
        let value = serde_json::to_value(&captured).unwrap();
        assert_eq!(value["coordinates"], "1.5, 32.5");
        assert_eq!(value["displayName"], "1.500000, 32.500000");
        assert_eq!(normalize(&value), Some(Coordinates { lat: 1.5, lon: 32.5 }));
    }
}
