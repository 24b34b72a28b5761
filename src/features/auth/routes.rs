use crate::features::auth::handlers;
use crate::features::auth::services::AdminSessionService;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Tier login routes (no authentication required)
pub fn public_routes(service: Arc<AdminSessionService>) -> Router {
    Router::new()
        .route("/api/admin/login", post(handlers::admin_login))
        .route("/api/super-admin/login", post(handlers::super_admin_login))
        .with_state(service)
}
