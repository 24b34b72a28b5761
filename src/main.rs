mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::{self, routes as auth_routes, AdminSessionService};
use crate::features::geo::{routes as geo_routes, GeocodingService, RoutingService};
use crate::features::loading_charges::{routes as charges_routes, LoadingChargeService};
use crate::features::truck_drivers::{routes as drivers_routes, TruckDriverService};
use crate::features::users::{routes as users_routes, UserService};
use axum::{middleware::from_fn_with_state, Router};
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // .env first so RUST_LOG applies to the subscriber
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Starting haulage-core: workers={}, pid={}",
        worker_threads,
        std::process::id()
    );

    let pool = database::create_pool(&config.database).await?;
    database::run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!(
        "Database ready (max_connections: {})",
        config.database.max_connections
    );

    // Driver auth: identity-provider tokens verified against the JWKS
    let jwks_client = Arc::new(auth::JwksClient::new(
        &config.auth.jwks_url,
        config.auth.jwks_cache_ttl,
    ));
    let jwt_validator = Arc::new(auth::JwtValidator::new(
        jwks_client,
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
        config.auth.jwt_leeway,
    ));
    tracing::info!("Driver auth initialized (issuer: {})", config.auth.issuer);

    // Admin tiers: password login, signed session tokens
    let admin_sessions = Arc::new(AdminSessionService::new(&config.admin));
    tracing::info!(
        "Admin sessions initialized (ttl: {}s)",
        config.admin.session_ttl.as_secs()
    );

    // Initialize MinIO client for photo storage
    let minio_client = Arc::new(
        modules::storage::MinIOClient::new(config.minio.clone())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?,
    );
    minio_client
        .ensure_bucket_exists()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to ensure MinIO bucket exists: {}", e))?;
    tracing::info!(
        "MinIO client initialized for bucket: {}",
        minio_client.bucket_name()
    );

    // External geo services
    let geocoding_service = Arc::new(
        GeocodingService::new(&config.geo)
            .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding: {}", e))?,
    );
    let routing_service = Arc::new(
        RoutingService::new(&config.geo)
            .map_err(|e| anyhow::anyhow!("Failed to initialize routing: {}", e))?,
    );
    if config.geo.locationiq_api_key.is_none() {
        tracing::warn!("LOCATIONIQ_API_KEY not set: place search and route previews will fail");
    }
    tracing::info!("Geo services initialized");

    let user_service = Arc::new(UserService::new(pool.clone()));
    let truck_driver_service = Arc::new(TruckDriverService::new(
        pool.clone(),
        Arc::clone(&minio_client),
    ));
    let loading_charge_service = Arc::new(LoadingChargeService::new(
        pool.clone(),
        Arc::clone(&minio_client),
        Arc::clone(&truck_driver_service),
        Arc::clone(&user_service),
        Arc::clone(&routing_service),
    ));
    tracing::info!("Feature services initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn_with_state(
                Arc::new(credentials),
                middleware::swagger_basic_auth,
            ))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Driver routes (require identity-provider JWT)
    let driver_routes = Router::new()
        .merge(users_routes::routes(Arc::clone(&user_service)))
        .merge(geo_routes::routes(geocoding_service))
        .merge(drivers_routes::routes(Arc::clone(&truck_driver_service)))
        .merge(charges_routes::routes(Arc::clone(&loading_charge_service)))
        .route_layer(from_fn_with_state(
            jwt_validator,
            middleware::auth_middleware,
        ));

    // Admin and super-admin routes (require admin session; guards check the tier)
    let admin_routes = Router::new()
        .merge(charges_routes::admin_routes(Arc::clone(&loading_charge_service)))
        .merge(drivers_routes::admin_routes(Arc::clone(&truck_driver_service)))
        .merge(drivers_routes::super_admin_routes(truck_driver_service))
        .merge(users_routes::super_admin_routes(user_service))
        .route_layer(from_fn_with_state(
            Arc::clone(&admin_sessions),
            middleware::admin_session_middleware,
        ));

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(auth_routes::public_routes(admin_sessions))
        .merge(geo_routes::public_routes())
        .merge(charges_routes::public_routes());

    let app = Router::new()
        .merge(swagger)
        .merge(driver_routes)
        .merge(admin_routes)
        .merge(public_routes)
        .merge(health_route)
        .layer(RequestBodyLimitLayer::new(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address {}: {}", addr, e))?;

    let listener = bind_listener(socket_addr)?;
    tracing::info!("Listening on http://{} (docs at /swagger-ui/)", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// TCP listener with reuse, nodelay and keepalive set before bind
fn bind_listener(addr: std::net::SocketAddr) -> std::io::Result<tokio::net::TcpListener> {
    use socket2::{Domain, Protocol, Socket, TcpKeepalive, Type};
    use std::time::Duration;

    const BUFFER_SIZE: usize = 256 * 1024;
    const BACKLOG: i32 = 4096;

    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;
    socket.set_recv_buffer_size(BUFFER_SIZE)?;
    socket.set_send_buffer_size(BUFFER_SIZE)?;

    let keepalive = TcpKeepalive::new().with_time(Duration::from_secs(60));
    #[cfg(target_os = "linux")]
    let keepalive = keepalive
        .with_interval(Duration::from_secs(10))
        .with_retries(3);
    socket.set_tcp_keepalive(&keepalive)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    tokio::net::TcpListener::from_std(socket.into())
}
