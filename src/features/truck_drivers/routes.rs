use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::features::truck_drivers::handlers;
use crate::features::truck_drivers::services::TruckDriverService;
use crate::shared::constants::MAX_PHOTO_SIZE;

/// Multipart overhead on top of the photo itself
const FORM_OVERHEAD: usize = 1024 * 1024;

/// Driver routes (JWT authentication)
pub fn routes(service: Arc<TruckDriverService>) -> Router {
    Router::new()
        .route("/api/truck-drivers", get(handlers::list_for_form))
        .with_state(service)
}

/// Admin routes (admin session)
pub fn admin_routes(service: Arc<TruckDriverService>) -> Router {
    Router::new()
        .route(
            "/api/admin/truck-drivers",
            post(handlers::register_driver)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + FORM_OVERHEAD)),
        )
        .with_state(service)
}

/// Super-admin routes (admin session, super-admin tier)
pub fn super_admin_routes(service: Arc<TruckDriverService>) -> Router {
    Router::new()
        .route("/api/super-admin/truck-drivers", get(handlers::list_all))
        .route(
            "/api/super-admin/truck-drivers/{id}",
            put(handlers::update_driver)
                .delete(handlers::delete_driver)
                .layer(DefaultBodyLimit::max(MAX_PHOTO_SIZE + FORM_OVERHEAD)),
        )
        .with_state(service)
}
