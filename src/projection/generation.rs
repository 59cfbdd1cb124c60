//! Per-asset, per-year generation with ageing and calibration.

use tracing::{debug, warn};

use super::params::{HOURS_PER_YEAR, ProjectionParams};
use crate::error::ProjectionError;
use crate::portfolio::{Asset, Portfolio};

/// Output multiplier after `age` years of degradation.
///
/// Exactly 1.0 at age 0 and exactly `1 - rate` at age 1.
pub fn degradation_factor(age: u32, rate: f64) -> f64 {
    match i32::try_from(age) {
        Ok(age) => (1.0 - rate).powi(age),
        Err(_) => (1.0 - rate).powf(f64::from(age)),
    }
}

/// Undegraded annual output of `capacity_mw` at `capacity_factor` (GWh).
pub fn base_output_gwh(capacity_mw: f64, capacity_factor: f64) -> f64 {
    capacity_mw * HOURS_PER_YEAR * capacity_factor / 1000.0
}

/// Output of one asset in `year` (GWh), zero outside its operating life.
pub fn asset_output_gwh(
    asset: &Asset,
    year: i32,
    params: &ProjectionParams,
    scale_factor: f64,
) -> f64 {
    let Some(age) = asset.operating_age(year, params.life_years) else {
        return 0.0;
    };
    base_output_gwh(asset.capacity_mw, params.target_capacity_factor)
        * degradation_factor(age, params.degradation_rate)
        * scale_factor
}

/// Modeled, undegraded output of the assets operating in the reference year (GWh).
pub fn modeled_reference_gwh(portfolio: &Portfolio, params: &ProjectionParams) -> f64 {
    portfolio
        .assets()
        .iter()
        .filter(|a| a.is_operating(params.reference_year, params.life_years))
        .map(|a| base_output_gwh(a.capacity_mw, params.target_capacity_factor))
        .sum()
}

/// Calibration factor aligning modeled output with the reported reference figure.
///
/// # Errors
///
/// Returns an arithmetic error if no asset produces in the reference year
/// or the ratio is not finite.
pub fn scale_factor(portfolio: &Portfolio, params: &ProjectionParams) -> Result<f64, ProjectionError> {
    let modeled = modeled_reference_gwh(portfolio, params);
    if modeled <= 0.0 {
        return Err(ProjectionError::arithmetic(format!(
            "modeled generation in reference year {} is zero; cannot scale to {} GWh",
            params.reference_year, params.reference_generation_gwh
        )));
    }
    let factor = params.reference_generation_gwh / modeled;
    if !factor.is_finite() {
        return Err(ProjectionError::arithmetic(format!(
            "scale factor {factor} is not finite (modeled {modeled} GWh)"
        )));
    }
    debug!(modeled_gwh = modeled, factor, "computed scale factor");
    Ok(factor)
}

/// Dense generation grid over (year, asset).
///
/// Stored row-major by year: row `y - start_year` holds one value per asset,
/// in portfolio order.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationTable {
    start_year: i32,
    end_year: i32,
    asset_ids: Vec<String>,
    values: Vec<f64>,
}

impl GenerationTable {
    /// Computes the grid for every asset and every year of the analysis window.
    pub fn build(portfolio: &Portfolio, params: &ProjectionParams, scale_factor: f64) -> Self {
        let assets = portfolio.assets();
        let mut values = Vec::with_capacity(params.year_count() * assets.len());
        for year in params.years() {
            values.extend(
                assets
                    .iter()
                    .map(|a| asset_output_gwh(a, year, params, scale_factor)),
            );
        }

        let idle = assets
            .iter()
            .filter(|a| !params.years().any(|y| a.is_operating(y, params.life_years)))
            .count();
        if idle > 0 {
            warn!(
                idle,
                start_year = params.start_year,
                end_year = params.end_year,
                "assets produce nothing in the analysis window"
            );
        }

        Self {
            start_year: params.start_year,
            end_year: params.end_year,
            asset_ids: assets.iter().map(|a| a.id.clone()).collect(),
            values,
        }
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }

    pub fn end_year(&self) -> i32 {
        self.end_year
    }

    pub fn years(&self) -> std::ops::RangeInclusive<i32> {
        self.start_year..=self.end_year
    }

    pub fn year_count(&self) -> usize {
        let span = i64::from(self.end_year) - i64::from(self.start_year) + 1;
        usize::try_from(span).unwrap_or(0)
    }

    pub fn asset_count(&self) -> usize {
        self.asset_ids.len()
    }

    /// Asset ids in column order.
    pub fn asset_ids(&self) -> &[String] {
        &self.asset_ids
    }

    fn offset(&self, year: i32) -> Result<usize, ProjectionError> {
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

    /// Per-asset outputs for `year` (GWh).
    ///
    /// # Errors
    ///
    /// Returns a domain error if `year` is outside the table.
    pub fn row(&self, year: i32) -> Result<&[f64], ProjectionError> {
        let n = self.asset_count();
        let start = self.offset(year)? * n;
        Ok(&self.values[start..start + n])
    }

    /// Output of the asset at `asset_index` in `year` (GWh).
    ///
    /// # Errors
    ///
    /// Returns a domain error for years outside the table and a validation
    /// error for an unknown asset index.
    pub fn get(&self, year: i32, asset_index: usize) -> Result<f64, ProjectionError> {
        let row = self.row(year)?;
        row.get(asset_index).copied().ok_or_else(|| {
            ProjectionError::validation(
                "asset_index",
                format!("{asset_index} out of range for {} assets", row.len()),
            )
        })
    }

    /// Output of the asset with id `asset_id` in `year` (GWh).
    ///
    /// # Errors
    ///
    /// As [`Self::get`], with a validation error for an unknown id.
    pub fn get_by_id(&self, year: i32, asset_id: &str) -> Result<f64, ProjectionError> {
        let index = self
            .asset_ids
            .iter()
            .position(|id| id == asset_id)
            .ok_or_else(|| {
                ProjectionError::validation("asset_id", format!("unknown asset \"{asset_id}\""))
            })?;
        self.get(year, index)
    }

    /// Portfolio generation per year, in year order (GWh).
    pub fn annual_totals(&self) -> Vec<f64> {
        let n = self.asset_count();
        if n == 0 {
            return vec![0.0; self.year_count()];
        }
        self.values.chunks(n).map(|row| row.iter().sum()).collect()
    }
}
