mod form;
mod truck_driver_handler;

pub use truck_driver_handler::*;
