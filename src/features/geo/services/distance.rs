//! Great-circle distance and display helpers for transit legs.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::features::geo::models::{normalize, Coordinates};

/// Mean earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers, rounded to two decimals.
///
/// Non-finite input yields `0.0`; the figure is advisory and never fails a request.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    let distance = EARTH_RADIUS_KM * c;

    if distance.is_finite() {
        round2(distance)
    } else {
        0.0
    }
}

/// Distance between two raw location values; `0.0` when either cannot be normalized
pub fn distance_between(from: &Value, to: &Value) -> f64 {
    match (normalize(from), normalize(to)) {
        (Some(a), Some(b)) => distance_km(a, b),
        _ => {
            tracing::debug!("Skipping distance: location could not be normalized");
            0.0
        }
    }
}

/// `"850 m"` below one kilometer, `"12.40 km"` otherwise
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{} m", (km * 1000.0).round())
    } else {
        format!("{:.2} km", km)
    }
}

/// Fractional minutes between two instants, clamped at zero
pub fn elapsed_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let millis = (end - start).num_milliseconds().max(0);
    millis as f64 / 60_000.0
}

/// `"45 minutes"`, `"2 hours"`, `"1h 5m"`
pub fn format_duration(minutes: f64) -> String {
    if minutes < 60.0 {
        return format!("{} minutes", minutes.round());
    }

    let total = minutes.round() as i64;
    let hours = total / 60;
    let rest = total % 60;

    match (hours, rest) {
        (1, 0) => "1 hour".to_string(),
        (h, 0) => format!("{} hours", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates { lat, lon }
    }

    #[test]
    fn test_same_point_is_zero() {
        let kampala = point(0.3476, 32.5825);
        assert_eq!(distance_km(kampala, kampala), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let kampala = point(0.3476, 32.5825);
        let jinja = point(0.4244, 33.2042);
        assert_eq!(distance_km(kampala, jinja), distance_km(jinja, kampala));
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        assert_eq!(distance_km(point(0.0, 0.0), point(0.0, 1.0)), 111.19);
    }

    #[test]
    fn test_known_city_pair() {
        // Kampala to Jinja is roughly 70 km as the crow flies
        let d = distance_km(point(0.3476, 32.5825), point(0.4244, 33.2042));
        assert!(d > 65.0 && d < 75.0, "got {}", d);
    }

    #[test]
    fn test_non_finite_input_is_zero() {
        assert_eq!(distance_km(point(f64::NAN, 0.0), point(0.0, 1.0)), 0.0);
    }

    #[test]
    fn test_distance_between_mixed_shapes() {
        let loading = json!({"coordinates": "0, 0", "displayName": "Quarry"});
        let offloading = json!({"lat": "0", "lon": "1"});
        assert_eq!(distance_between(&loading, &offloading), 111.19);
    }

    #[test]
    fn test_distance_between_malformed_is_zero() {
        let loading = json!({"coordinates": "not,numbers"});
        let offloading = json!({"lat": "0", "lon": "1"});
        assert_eq!(distance_between(&loading, &offloading), 0.0);
        assert_eq!(distance_between(&json!("Quarry"), &offloading), 0.0);
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.85), "850 m");
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(1.0), "1.00 km");
        assert_eq!(format_distance(111.19), "111.19 km");
    }

    #[test]
    fn test_elapsed_minutes() {
        let start = Utc::now();
        assert_eq!(elapsed_minutes(start, start + Duration::seconds(90)), 1.5);
        assert_eq!(elapsed_minutes(start, start - Duration::minutes(5)), 0.0);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(12.4), "12 minutes");
        assert_eq!(format_duration(60.0), "1 hour");
        assert_eq!(format_duration(180.2), "3 hours");
        assert_eq!(format_duration(65.0), "1h 5m");
        assert_eq!(format_duration(119.7), "2 hours");
    }
}
