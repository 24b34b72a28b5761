//! Material classes drive which loading-form fields are derived or locked.

/// Chainage recorded for quarry materials
pub const QUARRY_CHAINAGE: &str = "28";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialClass {
    /// Murrum and top soil, measured by truck volume
    Volumetric,
    /// Aggregate, hardcore and stone base, weighed at the quarry
    Quarry,
    Other,
}

impl MaterialClass {
    const VOLUMETRIC: [&'static str; 2] = ["murrum", "top soil"];
    const QUARRY: [&'static str; 3] = ["aggregate", "hardcore", "stone base"];

    /// Case-insensitive, surrounding whitespace ignored
    pub fn of(material: Option<&str>) -> Self {
        let Some(material) = material.map(|m| m.trim().to_lowercase()) else {
            return MaterialClass::Other;
        };

        if Self::VOLUMETRIC.contains(&material.as_str()) {
            MaterialClass::Volumetric
        } else if Self::QUARRY.contains(&material.as_str()) {
            MaterialClass::Quarry
        } else {
            MaterialClass::Other
        }
    }

    pub fn mass_unit(&self) -> MassUnit {
        match self {
            MaterialClass::Volumetric => MassUnit::CubicMeters,
            MaterialClass::Quarry | MaterialClass::Other => MassUnit::Tonnes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassUnit {
    CubicMeters,
    Tonnes,
}

impl MassUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::CubicMeters => "m³",
            MassUnit::Tonnes => "tonnes",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_classes() {
        assert_eq!(MaterialClass::of(Some("murrum")), MaterialClass::Volumetric);
        assert_eq!(MaterialClass::of(Some("Top Soil")), MaterialClass::Volumetric);
        assert_eq!(MaterialClass::of(Some(" Hardcore ")), MaterialClass::Quarry);
        assert_eq!(MaterialClass::of(Some("stone base")), MaterialClass::Quarry);
        assert_eq!(MaterialClass::of(Some("sand")), MaterialClass::Other);
        assert_eq!(MaterialClass::of(None), MaterialClass::Other);
    }
}
