mod loading_charge_dto;

pub use loading_charge_dto::*;
