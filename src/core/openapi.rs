use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers, model as auth_model};
use crate::features::geo::{dtos as geo_dtos, handlers as geo_handlers, models as geo_models};
use crate::features::loading_charges::{dtos as charges_dtos, handlers as charges_handlers};
use crate::features::truck_drivers::{dtos as drivers_dtos, handlers as drivers_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Admin tier login
        auth_handlers::admin_login,
        auth_handlers::super_admin_login,
        // Geo
        geo_handlers::compute_distance,
        geo_handlers::reverse_geocode,
        geo_handlers::search_places,
        // Users
        users_handlers::sync_profile,
        users_handlers::list_users,
        users_handlers::toggle_block,
        // Truck drivers
        drivers_handlers::list_for_form,
        drivers_handlers::register_driver,
        drivers_handlers::list_all,
        drivers_handlers::update_driver,
        drivers_handlers::delete_driver,
        // Loading charges
        charges_handlers::form_rules,
        charges_handlers::create_charge,
        charges_handlers::list_in_transit,
        charges_handlers::map_markers,
        charges_handlers::get_charge,
        charges_handlers::route_preview,
        charges_handlers::confirm_offloading,
        charges_handlers::admin_list,
        charges_handlers::admin_stats,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_model::AdminTier,
            auth_dtos::AdminLoginDto,
            auth_dtos::AdminLoginResponseDto,
            ApiResponse<auth_dtos::AdminLoginResponseDto>,
            // Geo
            geo_models::Coordinates,
            geo_models::CapturedLocation,
            geo_models::CapturedAddress,
            geo_dtos::DistanceRequestDto,
            geo_dtos::DistanceResponseDto,
            geo_dtos::PlaceSuggestionDto,
            geo_dtos::RoutePlanDto,
            ApiResponse<geo_dtos::DistanceResponseDto>,
            ApiResponse<geo_models::CapturedLocation>,
            ApiResponse<Vec<geo_dtos::PlaceSuggestionDto>>,
            // Users
            users_dtos::SyncUserDto,
            users_dtos::UserResponseDto,
            ApiResponse<users_dtos::UserResponseDto>,
            ApiResponse<Vec<users_dtos::UserResponseDto>>,
            // Truck drivers
            drivers_dtos::TruckDriverDto,
            drivers_dtos::TruckDriverForm,
            ApiResponse<drivers_dtos::TruckDriverDto>,
            ApiResponse<Vec<drivers_dtos::TruckDriverDto>>,
            // Loading charges
            charges_dtos::FormRulesRequestDto,
            charges_dtos::FormRulesResponseDto,
            charges_dtos::CreateLoadingChargeDto,
            charges_dtos::OffloadDto,
            charges_dtos::LoadingChargeDto,
            charges_dtos::MapMarkerDto,
            charges_dtos::RoutePreviewDto,
            charges_dtos::ChargeStatsDto,
            ApiResponse<charges_dtos::FormRulesResponseDto>,
            ApiResponse<charges_dtos::LoadingChargeDto>,
            ApiResponse<Vec<charges_dtos::LoadingChargeDto>>,
            ApiResponse<Vec<charges_dtos::MapMarkerDto>>,
            ApiResponse<charges_dtos::RoutePreviewDto>,
            ApiResponse<charges_dtos::ChargeStatsDto>,
        )
    ),
    tags(
        (name = "geo", description = "Distance, reverse geocoding and place search"),
        (name = "users", description = "Driver profiles"),
        (name = "truck-drivers", description = "Registered trucks and drivers"),
        (name = "loading-charges", description = "Loading, transit and offloading"),
        (name = "admin", description = "Fleet overview and driver registration (admin tier)"),
        (name = "super-admin", description = "User moderation and driver registry (super-admin tier)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Haulage API",
        version = "0.1.0",
        description = "Truck loading and offloading tracking",
    )
)]
pub struct ApiDoc;

/// Registers the driver JWT and admin session schemes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from the identity provider"))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_session",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token from /api/admin/login or /api/super-admin/login"))
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/geo/distance",
            "/api/loading-charges/{uuid}/offload",
            "/api/admin/loading-charges",
            "/api/super-admin/truck-drivers/{id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {}",
                expected
            );
        }
    }

    #[test]
    fn test_security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.security_schemes.contains_key("admin_session"));
    }
}
