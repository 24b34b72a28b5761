//! Loading-form field derivation.
//!
//! The form's dependent fields are a pure function of the selected material
//! and the selected driver's registered capacity:
//!
//! | class | unit | mass value | mass locked | chainage | chainage locked | txn id editable |
//! |-------|------|------------|-------------|----------|-----------------|-----------------|
//! | volumetric | `m³` | capacity | when a driver is selected | free | no | no |
//! | quarry | `tonnes` | entered | no | `"28"` | yes | yes |
//! | other | `tonnes` | entered | no | free | no | no |
//!
//! The same derivation is re-applied on submission so locked values cannot be
//! overridden by the client.

use crate::core::error::{AppError, Result};
use crate::features::loading_charges::models::{MassUnit, MaterialClass, QUARRY_CHAINAGE};

#[derive(Debug, Clone, PartialEq)]
pub struct FormConstraints {
    pub material_class: MaterialClass,
    pub mass_unit: MassUnit,
    /// Prefilled mass; empty when the user enters it
    pub mass_value: String,
    pub mass_locked: bool,
    /// Prefilled chainage; empty when free text
    pub chainage: String,
    pub chainage_locked: bool,
    pub transaction_id_editable: bool,
}

pub fn derive_constraints(material: Option<&str>, driver_capacity: Option<f64>) -> FormConstraints {
    let material_class = MaterialClass::of(material);
    let mass_unit = material_class.mass_unit();

    match material_class {
        MaterialClass::Volumetric => {
            let capacity = driver_capacity.filter(|c| c.is_finite());
            FormConstraints {
                material_class,
                mass_unit,
                mass_value: capacity.map(format_capacity).unwrap_or_default(),
                mass_locked: capacity.is_some(),
                chainage: String::new(),
                chainage_locked: false,
                transaction_id_editable: false,
            }
        }
        MaterialClass::Quarry => FormConstraints {
            material_class,
            mass_unit,
            mass_value: String::new(),
            mass_locked: false,
            chainage: QUARRY_CHAINAGE.to_string(),
            chainage_locked: true,
            transaction_id_editable: true,
        },
        MaterialClass::Other => FormConstraints {
            material_class,
            mass_unit,
            mass_value: String::new(),
            mass_locked: false,
            chainage: String::new(),
            chainage_locked: false,
            transaction_id_editable: false,
        },
    }
}

/// Shortest decimal form: `12`, `12.5`
pub fn format_capacity(capacity: f64) -> String {
    format!("{}", capacity)
}

/// Dependent fields as submitted by the client
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmittedFields<'a> {
    pub material: Option<&'a str>,
    pub net_mass_value: Option<&'a str>,
    pub loading_chainage: Option<&'a str>,
    pub custom_transaction_id: Option<&'a str>,
}

/// Dependent fields after applying the constraints
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields {
    pub material: String,
    /// `"{value} {unit}"`
    pub net_mass: String,
    pub loading_chainage: String,
    pub custom_transaction_id: Option<i64>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Apply `constraints` to a submission. Locked fields take the derived value
/// whatever the client sent.
pub fn resolve_submission(
    submitted: SubmittedFields<'_>,
    constraints: &FormConstraints,
) -> Result<ResolvedFields> {
    let material = non_empty(submitted.material)
        .ok_or_else(|| AppError::Validation("Material is required".to_string()))?;

    let mass_value = if constraints.mass_locked {
        constraints.mass_value.as_str()
    } else {
        non_empty(submitted.net_mass_value)
            .ok_or_else(|| AppError::Validation("Net mass is required".to_string()))?
    };
    let mass = mass_value
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite() && *m > 0.0)
        .ok_or_else(|| AppError::Validation("Net mass must be a positive number".to_string()))?;

    let loading_chainage = if constraints.chainage_locked {
        constraints.chainage.clone()
    } else {
        non_empty(submitted.loading_chainage)
            .ok_or_else(|| AppError::Validation("Loading chainage is required".to_string()))?
            .to_string()
    };

    let custom_transaction_id = if constraints.transaction_id_editable {
        let raw = non_empty(submitted.custom_transaction_id).ok_or_else(|| {
            AppError::Validation(
                "Please enter a Transaction ID for the selected material.".to_string(),
            )
        })?;
        Some(raw.parse::<i64>().map_err(|_| {
            AppError::Validation("Transaction ID must be a whole number".to_string())
        })?)
    } else {
        None
    };

    Ok(ResolvedFields {
        material: material.to_string(),
        net_mass: format!("{} {}", format_capacity(mass), constraints.mass_unit.symbol()),
        loading_chainage,
        custom_transaction_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_murrum_with_driver_locks_capacity() {
        let c = derive_constraints(Some("murrum"), Some(12.0));
        assert_eq!(c.mass_unit.symbol(), "m³");
        assert_eq!(c.mass_value, "12");
        assert!(c.mass_locked);
        assert!(!c.chainage_locked);
        assert!(!c.transaction_id_editable);
    }

    #[test]
    fn test_top_soil_without_driver_is_unlocked() {
        let c = derive_constraints(Some("Top Soil"), None);
        assert_eq!(c.mass_unit, MassUnit::CubicMeters);
        assert_eq!(c.mass_value, "");
        assert!(!c.mass_locked);
    }

    #[test]
    fn test_hardcore_locks_chainage() {
        let c = derive_constraints(Some("hardcore"), Some(12.0));
        assert_eq!(c.mass_unit.symbol(), "tonnes");
        assert_eq!(c.mass_value, "");
        assert!(!c.mass_locked);
        assert_eq!(c.chainage, "28");
        assert!(c.chainage_locked);
        assert!(c.transaction_id_editable);
    }

    #[test]
    fn test_unknown_or_missing_material() {
        for material in [None, Some(""), Some("sand")] {
            let c = derive_constraints(material, Some(9.0));
            assert_eq!(c.material_class, MaterialClass::Other);
            assert_eq!(c.mass_unit, MassUnit::Tonnes);
            assert_eq!(c.mass_value, "");
            assert!(!c.mass_locked && !c.chainage_locked && !c.transaction_id_editable);
        }
    }

    #[test]
    fn test_reselecting_driver_reapplies_capacity() {
        let first = derive_constraints(Some("murrum"), Some(12.0));
        let second = derive_constraints(Some("murrum"), Some(7.5));
        assert_eq!(first.mass_value, "12");
        assert_eq!(second.mass_value, "7.5");
    }

    #[test]
    fn test_resolve_quarry_submission() {
        let c = derive_constraints(Some("aggregate"), None);
        let resolved = resolve_submission(
            SubmittedFields {
                material: Some("aggregate"),
                net_mass_value: Some("18.5"),
                loading_chainage: Some("14+200"),
                custom_transaction_id: Some("40512"),
            },
            &c,
        )
        .unwrap();

        assert_eq!(resolved.loading_chainage, "28");
        assert_eq!(resolved.custom_transaction_id, Some(40512));
        assert_eq!(resolved.net_mass, "18.5 tonnes");
    }

    #[test]
    fn test_resolve_locked_mass_ignores_client_value() {
        let c = derive_constraints(Some("murrum"), Some(12.0));
        let resolved = resolve_submission(
            SubmittedFields {
                material: Some("murrum"),
                net_mass_value: Some("99"),
                loading_chainage: Some("3+100"),
                custom_transaction_id: Some("7"),
            },
            &c,
        )
        .unwrap();

        assert_eq!(resolved.net_mass, "12 m³");
        assert_eq!(resolved.loading_chainage, "3+100");
        assert_eq!(resolved.custom_transaction_id, None);
    }

    #[test]
    fn test_resolve_requires_transaction_id_when_editable() {
        let c = derive_constraints(Some("stone base"), None);
        let err = resolve_submission(
            SubmittedFields {
                material: Some("stone base"),
                net_mass_value: Some("10"),
                ..Default::default()
            },
            &c,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = resolve_submission(
            SubmittedFields {
                material: Some("stone base"),
                net_mass_value: Some("10"),
                custom_transaction_id: Some("TX-1"),
                ..Default::default()
            },
            &c,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_resolve_requires_free_fields() {
        let c = derive_constraints(Some("sand"), None);
        assert!(resolve_submission(
            SubmittedFields {
                material: Some("sand"),
                net_mass_value: Some(" "),
                loading_chainage: Some("1+000"),
                ..Default::default()
            },
            &c,
        )
        .is_err());
        assert!(resolve_submission(
            SubmittedFields {
                material: Some("sand"),
                net_mass_value: Some("4"),
                ..Default::default()
            },
            &c,
        )
        .is_err());
    }
}
