use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::loading_charges::handlers;
use crate::features::loading_charges::services::LoadingChargeService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Base64 photo inside a JSON body
const PHOTO_BODY_LIMIT: usize = MAX_PHOTO_SIZE / 3 * 4 + 64 * 1024;

/// Stateless routes, no authentication
pub fn public_routes() -> Router {
    Router::new().route(
        "/api/loading-charges/form-rules",
        post(handlers::form_rules),
    )
}

/// Driver routes (JWT authentication)
pub fn routes(service: Arc<LoadingChargeService>) -> Router {
    Router::new()
        .route(
            "/api/loading-charges",
            post(handlers::create_charge).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .route(
            "/api/loading-charges/in-transit",
            get(handlers::list_in_transit),
        )
        .route("/api/loading-charges/map", get(handlers::map_markers))
        .route("/api/loading-charges/{uuid}", get(handlers::get_charge))
        .route(
            "/api/loading-charges/{uuid}/route",
            get(handlers::route_preview),
        )
        .route(
            "/api/loading-charges/{uuid}/offload",
            post(handlers::confirm_offloading).layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT)),
        )
        .with_state(service)
}

/// Admin routes (admin session)
pub fn admin_routes(service: Arc<LoadingChargeService>) -> Router {
    Router::new()
        .route("/api/admin/loading-charges", get(handlers::admin_list))
        .route("/api/admin/stats", get(handlers::admin_stats))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_form_rules_for_volumetric_material() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/loading-charges/form-rules")
            .json(&json!({"material": "murrum", "cubic_meters": 12.0}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["material_class"], "volumetric");
        assert_eq!(body["data"]["mass_unit"], "m³");
        assert_eq!(body["data"]["mass_value"], "12");
        assert_eq!(body["data"]["mass_locked"], true);
        assert_eq!(body["data"]["chainage_locked"], false);
    }

    #[tokio::test]
    async fn test_form_rules_for_quarry_material() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/loading-charges/form-rules")
            .json(&json!({"material": "hardcore"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["mass_unit"], "tonnes");
        assert_eq!(body["data"]["mass_value"], "");
        assert_eq!(body["data"]["chainage"], "28");
        assert_eq!(body["data"]["chainage_locked"], true);
        assert_eq!(body["data"]["transaction_id_editable"], true);
    }

    #[tokio::test]
    async fn test_form_rules_without_material() {
        let server = TestServer::new(public_routes()).unwrap();

        let response = server
            .post("/api/loading-charges/form-rules")
            .json(&json!({}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["material_class"], "other");
        assert_eq!(body["data"]["mass_locked"], false);
    }
}
