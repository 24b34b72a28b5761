mod loading_charge_handler;

pub use loading_charge_handler::*;
