//! Driver profiles and moderation.
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/users/sync` | Driver | Upsert own profile |
//! | GET | `/api/super-admin/users` | Super admin | List/search users |
//! | POST | `/api/super-admin/users/{user_id}/toggle-block` | Super admin | Toggle block |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
