mod truck_driver_dto;

pub use truck_driver_dto::*;
