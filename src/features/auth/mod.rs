//! Authentication for the three audiences of the API.
//!
//! - Drivers: bearer tokens from the OIDC identity provider, verified against its JWKS.
//! - Admin and super admin: password login per tier, answered with an HS256
//!   session token that expires after the configured TTL (24 hours by default).

mod jwks;
mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use jwks::JwksClient;
pub use services::AdminSessionService;
pub use validator::JwtValidator;
