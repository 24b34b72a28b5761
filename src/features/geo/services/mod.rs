mod distance;
mod geocoding_service;
mod routing_service;

pub use distance::{
    distance_between, distance_km, elapsed_minutes, format_distance, format_duration,
};
pub use geocoding_service::GeocodingService;
pub use routing_service::RoutingService;
