//! Immutable economic and technical parameters of a projection run.

use std::ops::RangeInclusive;

use crate::error::{ProjectionError, first_error};

/// Hours in a (non-leap) year, used to turn MW into MWh.
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// Longest analysis window accepted by validation (years).
pub const MAX_WINDOW_YEARS: i64 = 500;

/// Parameters consumed by [`crate::projection::project`].
///
/// Built once (usually from a [`crate::config::ScenarioConfig`]) and passed
/// by reference; nothing in the pipeline mutates it.
///
/// # Examples
///
/// ```
/// use revenue_projector::projection::ProjectionParams;
///
/// let params = ProjectionParams::baseline();
/// assert!(params.validate().is_ok());
/// assert_eq!(params.year_count(), 25);
/// assert!((params.net_revenue_ratio() - 0.88).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionParams {
    /// Average realised power price (£/MWh).
    pub price_per_mwh: f64,
    /// Operating and maintenance cost as a share of gross revenue.
    pub om_cost_ratio: f64,
    /// Management fee as a share of gross revenue.
    pub mgmt_fee_ratio: f64,
    /// Annual discount rate.
    pub discount_rate: f64,
    /// First year of the analysis window (discounting base year).
    pub start_year: i32,
    /// Last year of the analysis window (inclusive).
    pub end_year: i32,
    /// Year whose reported generation calibrates the model.
    pub reference_year: i32,
    /// Reported portfolio generation in the reference year (GWh).
    pub reference_generation_gwh: f64,
    pub target_capacity_factor: f64,
    /// Operating life of an asset (years).
    pub life_years: u32,
    /// Fractional output loss per year of age.
    pub degradation_rate: f64,
    /// Value the NPV is compared against, e.g. market capitalisation (£m).
    pub reference_value: f64,
}

impl ProjectionParams {
    /// Parameters of the original UK wind portfolio analysis.
    pub fn baseline() -> Self {
        Self {
            price_per_mwh: 65.0,
            om_cost_ratio: 0.10,
            mgmt_fee_ratio: 0.02,
            discount_rate: 0.08,
            start_year: 2025,
            end_year: 2049,
            reference_year: 2024,
            reference_generation_gwh: 5484.0,
            target_capacity_factor: 0.31,
            life_years: 25,
            degradation_rate: 0.005,
            reference_value: 2280.0,
        }
    }

    /// Number of years in the analysis window, as an `i64` so any pair of
    /// `i32` bounds fits. Zero or negative when the range is inverted.
    pub fn window_span(&self) -> i64 {
        i64::from(self.end_year) - i64::from(self.start_year) + 1
    }

    /// Number of years in the analysis window (0 if the range is inverted).
    pub fn year_count(&self) -> usize {
        usize::try_from(self.window_span()).unwrap_or(0)
    }

    /// Years of the analysis window in order.
    pub fn years(&self) -> RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    /// Offset of `year` from `start_year`.
    ///
    /// # Errors
    ///
    /// Returns a domain error if `year` lies outside the analysis window.
    pub fn year_offset(&self, year: i32) -> Result<usize, ProjectionError> {
        if year < self.start_year || year > self.end_year {
            return Err(ProjectionError::Domain {
                year,
                start_year: self.start_year,
                end_year: self.end_year,
            });
        }
        usize::try_from(i64::from(year) - i64::from(self.start_year)).map_err(|_| {
            ProjectionError::arithmetic(format!("offset of {year} does not fit in usize"))
        })
    }

    /// Share of gross revenue left after O&M and management fees.
    pub fn net_revenue_ratio(&self) -> f64 {
        1.0 - self.om_cost_ratio - self.mgmt_fee_ratio
    }

    /// Collects every constraint violation, using config field paths.
    pub fn violations(&self) -> Vec<ProjectionError> {
        let mut errors = Vec::new();
        let mut check = |ok: bool, field: &str, message: &str| {
            if !ok {
                errors.push(ProjectionError::validation(field, message));
            }
        };

        check(
            self.price_per_mwh.is_finite() && self.price_per_mwh >= 0.0,
            "economics.price_per_mwh",
            "must be finite and >= 0",
        );
        check(
            (0.0..=1.0).contains(&self.om_cost_ratio),
            "economics.om_cost_ratio",
            "must be in [0.0, 1.0]",
        );
        check(
            (0.0..=1.0).contains(&self.mgmt_fee_ratio),
            "economics.mgmt_fee_ratio",
            "must be in [0.0, 1.0]",
        );
        check(
            self.om_cost_ratio + self.mgmt_fee_ratio <= 1.0,
            "economics.om_cost_ratio",
            "om_cost_ratio + mgmt_fee_ratio must be <= 1 (net revenue would be negative)",
        );
        check(
            self.discount_rate.is_finite() && self.discount_rate > -1.0,
            "economics.discount_rate",
            "must be finite and > -1",
        );
        check(
            self.reference_value.is_finite() && self.reference_value > 0.0,
            "economics.reference_value",
            "must be finite and > 0",
        );
        check(
            self.start_year <= self.end_year,
            "analysis.start_year",
            "must be <= analysis.end_year",
        );
        check(
            self.window_span() <= MAX_WINDOW_YEARS,
            "analysis.end_year",
            &format!("analysis window must span at most {MAX_WINDOW_YEARS} years"),
        );
        check(
            self.reference_generation_gwh.is_finite() && self.reference_generation_gwh > 0.0,
            "analysis.reference_generation_gwh",
            "must be finite and > 0",
        );
        check(
            self.target_capacity_factor > 0.0 && self.target_capacity_factor <= 1.0,
            "generation.target_capacity_factor",
            "must be in (0.0, 1.0]",
        );
        check(
            self.life_years > 0,
            "generation.life_years",
            "must be > 0",
        );
        check(
            (0.0..1.0).contains(&self.degradation_rate),
            "generation.degradation_rate",
            "must be in [0.0, 1.0)",
        );

        errors
    }

    /// Validates all parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violation found by [`Self::violations`].
    pub fn validate(&self) -> Result<(), ProjectionError> {
        first_error(self.violations())
    }
}
