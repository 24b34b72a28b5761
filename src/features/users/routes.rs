use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::services::UserService;

/// Driver routes (JWT authentication)
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/sync", post(handlers::sync_profile))
        .with_state(service)
}

/// Super-admin moderation routes (admin session)
pub fn super_admin_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/super-admin/users", get(handlers::list_users))
        .route(
            "/api/super-admin/users/{user_id}/toggle-block",
            post(handlers::toggle_block),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AdminTier;
    use crate::shared::test_helpers::{lazy_pool, with_admin_session, with_driver};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn service() -> Arc<UserService> {
        Arc::new(UserService::new(lazy_pool()))
    }

    #[tokio::test]
    async fn test_user_list_requires_session() {
        let server = TestServer::new(super_admin_routes(service())).unwrap();

        let response = server
            .get("/api/super-admin/users")
            .expect_failure()
            .await;

        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_admin_tier_cannot_toggle_block() {
        let router = with_admin_session(super_admin_routes(service()), AdminTier::Admin);
        let server = TestServer::new(router).unwrap();

        let response = server
            .post("/api/super-admin/users/user_123/toggle-block")
            .expect_failure()
            .await;

        response.assert_status_forbidden();
        let body: Value = response.json();
        assert_eq!(body["message"], "Super admin access required");
    }

    #[tokio::test]
    async fn test_sync_requires_driver() {
        let server = TestServer::new(routes(service())).unwrap();

        let response = server
            .post("/api/users/sync")
            .json(&json!({"username": "jdoe"}))
            .expect_failure()
            .await;

        response.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_sync_rejects_invalid_image_url() {
        let server = TestServer::new(with_driver(routes(service()))).unwrap();

        let response = server
            .post("/api/users/sync")
            .json(&json!({"username": "jdoe", "imageurl": "not a url"}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }
}
