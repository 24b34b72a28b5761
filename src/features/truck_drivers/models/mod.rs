mod truck_driver;

pub use truck_driver::TruckDriver;
