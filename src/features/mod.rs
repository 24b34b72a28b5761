pub mod auth;
pub mod geo;
pub mod loading_charges;
pub mod truck_drivers;
pub mod users;
