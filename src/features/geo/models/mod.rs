mod coordinates;
mod location;

pub use coordinates::Coordinates;
pub use location::{normalize, CapturedAddress, CapturedLocation, Location};
