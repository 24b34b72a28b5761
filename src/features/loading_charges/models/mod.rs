mod loading_charge;
mod material;

pub use loading_charge::{ChargeStatus, LoadingCharge, NewLoadingCharge};
pub use material::{MassUnit, MaterialClass, QUARRY_CHAINAGE};
