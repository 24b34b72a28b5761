use std::collections::HashSet;

use crate::features::loading_charges::models::ChargeStatus;

/// Fleet summary for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChargeStats {
    pub total: i64,
    pub in_transit: i64,
    pub completed: i64,
    pub unique_drivers: i64,
}

impl ChargeStats {
    /// Tally `(status, driver_name)` pairs
    pub fn tally<'a, I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut stats = ChargeStats::default();
        let mut drivers = HashSet::new();

        for (status, driver_name) in rows {
            stats.total += 1;
            if ChargeStatus::is_in_transit(status) {
                stats.in_transit += 1;
            }
            if ChargeStatus::is_completed(status) {
                stats.completed += 1;
            }
            drivers.insert(driver_name);
        }

        stats.unique_drivers = drivers.len() as i64;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let stats = ChargeStats::tally([
            ("In transit", "John"),
            ("completed", "John"),
            ("Delivered", "Mary"),
            ("cancelled", "Peter"),
        ]);
        assert_eq!(
            stats,
            ChargeStats {
                total: 4,
                in_transit: 1,
                completed: 2,
                unique_drivers: 3,
            }
        );
    }

    #[test]
    fn test_tally_empty() {
        assert_eq!(ChargeStats::tally(std::iter::empty::<(&str, &str)>()), ChargeStats::default());
    }
}
