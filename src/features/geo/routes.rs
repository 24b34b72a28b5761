use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::geo::handlers;
use crate::features::geo::services::GeocodingService;

/// Stateless geo routes, no authentication
pub fn public_routes() -> Router {
    Router::new().route("/api/geo/distance", post(handlers::compute_distance))
}

/// Geocoding routes for signed-in drivers
pub fn routes(service: Arc<GeocodingService>) -> Router {
    Router::new()
        .route("/api/geo/reverse", get(handlers::reverse_geocode))
        .route("/api/geo/search", get(handlers::search_places))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_distance_between_mixed_shapes() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/geo/distance")
            .json(&json!({
                "from": {"coordinates": "0, 0", "displayName": "Origin"},
                "to": {"lat": "0", "lon": "1"}
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["distance_km"], 111.19);
        assert_eq!(body["data"]["formatted"], "111.19 km");
    }

    #[tokio::test]
    async fn test_distance_with_unusable_location_is_zero() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/geo/distance")
            .json(&json!({
                "from": "Quarry gate",
                "to": {"coordinates": "not,numbers"}
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["distance_km"], 0.0);
        assert_eq!(body["data"]["formatted"], "0 m");
    }

    #[tokio::test]
    async fn test_distance_rejects_missing_side() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/geo/distance")
            .json(&json!({"from": {"lat": 1.0, "lon": 2.0}}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
    }
}
