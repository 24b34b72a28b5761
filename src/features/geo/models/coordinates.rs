use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A point in decimal degrees. Never stored; always rebuilt from a location shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Returns `None` unless both components are finite numbers
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        (lat.is_finite() && lon.is_finite()).then_some(Self { lat, lon })
    }

    /// Parse a `"lat,lon"` pair. Whitespace around either part is ignored.
    pub fn parse_pair(pair: &str) -> Option<Self> {
        let mut parts = pair.split(',');
        let lat = parts.next()?.trim().parse::<f64>().ok()?;
        let lon = parts.next()?.trim().parse::<f64>().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Self::new(lat, lon)
    }

    /// `"lat, lon"`, the form device captures are stored in
    pub fn to_pair_string(&self) -> String {
        format!("{}, {}", self.lat, self.lon)
    }

    /// Six-decimal label used when no place name is known
    pub fn to_label(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            Coordinates::parse_pair("1.5,32.5"),
            Some(Coordinates { lat: 1.5, lon: 32.5 })
        );
        assert_eq!(
            Coordinates::parse_pair(" 0.3476 , 32.5825 "),
            Some(Coordinates {
                lat: 0.3476,
                lon: 32.5825
            })
        );
    }

    #[test]
    fn test_parse_pair_rejects_malformed() {
        assert_eq!(Coordinates::parse_pair("not,numbers"), None);
        assert_eq!(Coordinates::parse_pair("1.5"), None);
        assert_eq!(Coordinates::parse_pair("1.5,32.5,7"), None);
        assert_eq!(Coordinates::parse_pair(""), None);
        assert_eq!(Coordinates::parse_pair("NaN,1"), None);
        assert_eq!(Coordinates::parse_pair("inf,1"), None);
    }

    #[test]
    fn test_string_forms() {
        let c = Coordinates { lat: 1.5, lon: 32.5 };
        assert_eq!(c.to_pair_string(), "1.5, 32.5");
        assert_eq!(c.to_label(), "1.500000, 32.500000");
        assert_eq!(Coordinates::parse_pair(&c.to_pair_string()), Some(c));
    }
}
