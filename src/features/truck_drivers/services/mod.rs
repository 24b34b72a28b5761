mod truck_driver_service;

pub use truck_driver_service::TruckDriverService;
