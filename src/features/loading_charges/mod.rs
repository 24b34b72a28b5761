//! Loading charges: a truck pickup recorded in transit and closed once by
//! an offloading confirmation.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/loading-charges/form-rules` | None | Dependent form fields |
//! | POST | `/api/loading-charges` | Driver | Create |
//! | GET | `/api/loading-charges/in-transit` | Driver | Open charges |
//! | GET | `/api/loading-charges/map` | Driver | Live map markers |
//! | GET | `/api/loading-charges/{uuid}` | Driver | Detail |
//! | GET | `/api/loading-charges/{uuid}/route` | Driver | Route preview |
//! | POST | `/api/loading-charges/{uuid}/offload` | Driver | Confirm offloading |
//! | GET | `/api/admin/loading-charges` | Admin | Filtered list |
//! | GET | `/api/admin/stats` | Admin | Fleet statistics |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::LoadingChargeService;
