//! Geographic helpers shared by the loading-charge workflow.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/geo/distance` | No | Distance between two raw locations |
//! | GET | `/api/geo/reverse` | Yes | Reverse geocode a coordinate |
//! | GET | `/api/geo/search` | Yes | Place autocomplete |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{GeocodingService, RoutingService};
