use serde::Deserialize;

use crate::core::config::GeoConfig;
use crate::core::error::{AppError, Result};
use crate::features::geo::dtos::RoutePlanDto;
use crate::features::geo::models::Coordinates;

const NO_ROUTE_MESSAGE: &str = "No route could be found between the specified points.";

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    pub code: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: String,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsLeg {
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsStep {
    pub maneuver: Option<Maneuver>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Maneuver {
    pub instruction: Option<String>,
}

/// Driving directions through the LocationIQ directions API
pub struct RoutingService {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RoutingService {
    pub fn new(config: &GeoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.locationiq_base_url.trim_end_matches('/').to_string(),
            api_key: config.locationiq_api_key.clone(),
        })
    }

    /// Fetch a driving route from `from` to `to`
    pub async fn fetch_route(&self, from: Coordinates, to: Coordinates) -> Result<RoutePlanDto> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AppError::ExternalServiceError("Location service is not configured".to_string())
        })?;

        // LocationIQ takes lon,lat order
        let url = format!(
            "{}/v1/directions/driving/{},{};{},{}?key={}&steps=true&geometries=polyline&overview=full",
            self.base_url, from.lon, from.lat, to.lon, to.lat, api_key
        );

        tracing::debug!(
            "Requesting route {} -> {}",
            from.to_pair_string(),
            to.to_pair_string()
        );

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Directions request failed: {}", e))
        })?;

        let status = response.status();
        let body: DirectionsResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!(
                "Failed to parse directions response (status {}): {}",
                status, e
            ))
        })?;

        route_plan(body)
    }
}

/// Turn a directions payload into a route plan.
///
/// Anything other than an `Ok` code with at least one route is a failure.
pub fn route_plan(body: DirectionsResponse) -> Result<RoutePlanDto> {
    if body.code.as_deref() != Some("Ok") {
        if let Some(message) = &body.message {
            tracing::warn!("Directions API returned {:?}: {}", body.code, message);
        }
        return Err(AppError::ExternalServiceError(NO_ROUTE_MESSAGE.to_string()));
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| AppError::ExternalServiceError(NO_ROUTE_MESSAGE.to_string()))?;

    let steps = route
        .legs
        .iter()
        .flat_map(|leg| leg.steps.iter())
        .filter_map(|step| {
            step.maneuver
                .as_ref()
                .and_then(|m| m.instruction.clone())
                .or_else(|| step.name.clone().filter(|n| !n.is_empty()))
        })
        .collect();

    Ok(RoutePlanDto {
        geometry: route.geometry,
        distance_meters: route.distance,
        duration_seconds: route.duration,
        steps,
    })
}
