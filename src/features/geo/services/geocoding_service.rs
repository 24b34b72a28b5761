use serde::Deserialize;

use crate::core::config::GeoConfig;
use crate::core::error::{AppError, Result};
use crate::features::geo::dtos::PlaceSuggestionDto;
use crate::features::geo::models::{CapturedAddress, CapturedLocation, Coordinates};

/// Nominatim reverse geocoding response
#[derive(Debug, Deserialize)]
pub struct NominatimReverse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
pub struct NominatimAddress {
    pub state: Option<String>,
    pub country: Option<String>,
    pub village: Option<String>,
    pub country_code: Option<String>,
    #[serde(rename = "ISO3166-2-lvl3")]
    pub iso3166_2_lvl3: Option<String>,
    #[serde(rename = "ISO3166-2-lvl4")]
    pub iso3166_2_lvl4: Option<String>,
}

/// LocationIQ autocomplete entry
#[derive(Debug, Deserialize)]
pub struct LocationIqPlace {
    pub place_id: Option<String>,
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

/// Reverse geocoding (Nominatim) and place search (LocationIQ)
pub struct GeocodingService {
    client: reqwest::Client,
    nominatim_base_url: String,
    autocomplete_url: String,
    api_key: Option<String>,
}

impl GeocodingService {
    const SEARCH_LIMIT: u8 = 5;

    pub fn new(config: &GeoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            nominatim_base_url: config.nominatim_base_url.trim_end_matches('/').to_string(),
            autocomplete_url: config.locationiq_autocomplete_url.clone(),
            api_key: config.locationiq_api_key.clone(),
        })
    }

    /// Describe a captured position.
    ///
    /// Lookup failures are not errors: the capture falls back to a
    /// coordinate-only label so the driver can still proceed.
    pub async fn reverse_geocode(&self, point: Coordinates) -> CapturedLocation {
        let url = format!(
            "{}/reverse?format=json&lat={}&lon={}",
            self.nominatim_base_url, point.lat, point.lon
        );

        let lookup = async {
            let response = self.client.get(&url).send().await?.error_for_status()?;
            response.json::<NominatimReverse>().await
        };

        match lookup.await {
            Ok(body) => capture_from_reverse(point, Some(body)),
            Err(e) => {
                tracing::warn!("Reverse geocoding failed for {}: {}", point.to_label(), e);
                capture_from_reverse(point, None)
            }
        }
    }

    /// Autocomplete place names for destination selection
    pub async fn search_places(&self, query: &str) -> Result<Vec<PlaceSuggestionDto>> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError("Location service is not configured".to_string())
        })?;

        let url = format!(
            "{}?key={}&q={}&limit={}&normalizecity=1",
            self.autocomplete_url,
            api_key,
            urlencoding::encode(query),
            Self::SEARCH_LIMIT
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Place search request failed: {}", e))
        })?;

        // LocationIQ answers 404 when nothing matches
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "Place search returned status {}",
                response.status()
            )));
        }

        let places: Vec<LocationIqPlace> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse place search response: {}", e))
        })?;

        Ok(places.into_iter().filter_map(suggestion_from_place).collect())
    }
}

/// Build the stored capture shape from an optional reverse lookup
pub fn capture_from_reverse(point: Coordinates, body: Option<NominatimReverse>) -> CapturedLocation {
    let Some(body) = body else {
        return CapturedLocation::bare(point);
    };

    let address = body
        .address
        .map(|a| CapturedAddress {
            state: a.state,
            country: a.country,
            village: a.village,
            country_code: a.country_code,
            iso3166_2_lvl3: a.iso3166_2_lvl3,
            iso3166_2_lvl4: a.iso3166_2_lvl4,
        })
        .unwrap_or_default();

    CapturedLocation {
        address,
        coordinates: point.to_pair_string(),
        display_name: body
            .display_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| point.to_label()),
    }
}

/// Drop suggestions whose position does not parse
fn suggestion_from_place(place: LocationIqPlace) -> Option<PlaceSuggestionDto> {
    let lat = place.lat.trim().parse::<f64>().ok()?;
    let lon = place.lon.trim().parse::<f64>().ok()?;
    Coordinates::new(lat, lon)?;

    Some(PlaceSuggestionDto {
        place_id: place.place_id,
        display_name: place.display_name,
        lat: place.lat,
        lon: place.lon,
    })
}
