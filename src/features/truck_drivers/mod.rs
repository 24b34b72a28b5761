//! Truck driver registry.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/truck-drivers` | Driver | Drivers for the loading form |
//! | POST | `/api/admin/truck-drivers` | Admin | Register (multipart) |
//! | GET | `/api/super-admin/truck-drivers` | Super admin | List, newest first |
//! | PUT | `/api/super-admin/truck-drivers/{id}` | Super admin | Edit (multipart) |
//! | DELETE | `/api/super-admin/truck-drivers/{id}` | Super admin | Delete with license photo |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::TruckDriverService;
