use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// A single generating asset (one wind farm) in the portfolio.
///
/// Assets are created once, by the generator or a CSV import, and are
/// read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Unique identifier within the portfolio.
    #[serde(rename = "asset")]
    pub id: String,
    /// Installed capacity (MW, > 0).
    #[serde(rename = "mw")]
    pub capacity_mw: f64,
    /// First year of operation.
    pub commission_year: i32,
}

impl Asset {
    /// Creates a new asset record.
    pub fn new(id: impl Into<String>, capacity_mw: f64, commission_year: i32) -> Self {
        Self {
            id: id.into(),
            capacity_mw,
            commission_year,
        }
    }

    /// Operating age in `year` (negative before commissioning).
    ///
    /// Widened to `i64` so any commission year read from a file is safe.
    pub fn age_in(&self, year: i32) -> i64 {
        i64::from(year) - i64::from(self.commission_year)
    }

    /// Operating age in `year` while the asset is within its life, else `None`.
    pub fn operating_age(&self, year: i32, life_years: u32) -> Option<u32> {
        u32::try_from(self.age_in(year))
            .ok()
            .filter(|&age| age < life_years)
    }

    /// Whether the asset produces in `year` given a lifetime of `life_years`.
    pub fn is_operating(&self, year: i32, life_years: u32) -> bool {
        self.operating_age(year, life_years).is_some()
    }
}

/// Ordered arena of assets.
///
/// Asset indices are stable for the lifetime of the portfolio and are the
/// column indices of [`crate::projection::GenerationTable`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Portfolio {
    assets: Vec<Asset>,
}

impl Portfolio {
    /// Builds a portfolio, rejecting duplicate ids and bad capacities.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending asset.
    pub fn new(assets: Vec<Asset>) -> Result<Self, ProjectionError> {
        let mut seen = HashSet::with_capacity(assets.len());
        for (i, asset) in assets.iter().enumerate() {
            if !asset.capacity_mw.is_finite() || asset.capacity_mw <= 0.0 {
                return Err(ProjectionError::validation(
                    format!("portfolio[{i}].capacity_mw"),
                    format!(
                        "asset \"{}\" must have a finite capacity > 0, got {}",
                        asset.id, asset.capacity_mw
                    ),
                ));
            }
            if !seen.insert(asset.id.as_str()) {
                return Err(ProjectionError::validation(
                    format!("portfolio[{i}].id"),
                    format!("duplicate asset id \"{}\"", asset.id),
                ));
            }
        }
        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Index of the asset with the given id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.id == id)
    }

    /// Sum of installed capacity (MW).
    pub fn total_capacity_mw(&self) -> f64 {
        self.assets.iter().map(|a| a.capacity_mw).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operating_window_is_half_open() {
        let a = Asset::new("A000", 10.0, 2020);
        assert!(!a.is_operating(2019, 25));
        assert!(a.is_operating(2020, 25));
        assert!(a.is_operating(2044, 25));
        assert!(!a.is_operating(2045, 25));
    }

    #[test]
    fn extreme_commission_years_do_not_overflow() {
        let ancient = Asset::new("A000", 10.0, i32::MIN);
        assert_eq!(ancient.age_in(i32::MAX), i64::from(i32::MAX) - i64::from(i32::MIN));
        assert!(!ancient.is_operating(2025, 25));
        assert_eq!(ancient.operating_age(i32::MAX, u32::MAX), None);

        let future = Asset::new("A001", 10.0, i32::MAX);
        assert_eq!(future.age_in(i32::MIN), i64::from(i32::MIN) - i64::from(i32::MAX));
        assert!(!future.is_operating(i32::MIN, 25));
        assert_eq!(future.operating_age(i32::MAX, 25), Some(0));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = Portfolio::new(vec![
            Asset::new("A000", 10.0, 2020),
            Asset::new("A000", 12.0, 2015),
        ]);
        let err = result.err();
        assert_eq!(
            err.as_ref().and_then(ProjectionError::field),
            Some("portfolio[1].id")
        );
    }

    #[test]
    fn rejects_non_positive_capacity() {
        for bad in [0.0, -5.0, f64::NAN] {
            let result = Portfolio::new(vec![Asset::new("A000", bad, 2020)]);
            assert!(
                matches!(result, Err(ProjectionError::Validation { .. })),
                "capacity {bad} should be rejected"
            );
        }
    }

    #[test]
    fn index_and_total() {
        let p = Portfolio::new(vec![
            Asset::new("A000", 10.0, 2020),
            Asset::new("A001", 15.5, 2018),
        ])
        .expect("valid portfolio");
        assert_eq!(p.len(), 2);
        assert_eq!(p.index_of("A001"), Some(1));
        assert_eq!(p.index_of("B"), None);
        assert!((p.total_capacity_mw() - 25.5).abs() < 1e-12);
    }
}
