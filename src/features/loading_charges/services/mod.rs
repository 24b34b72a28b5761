mod charge_filter;
mod charge_stats;
mod form_rules;
mod loading_charge_service;

pub use charge_stats::ChargeStats;
pub use form_rules::{derive_constraints, FormConstraints};
pub use loading_charge_service::{split_list_params, LoadingChargeService};
