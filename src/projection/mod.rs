//! Generation, revenue and discounting pipeline.

/// Degradation, calibration and the dense generation grid.
pub mod generation;
pub mod params;
/// Revenue, discount factors and the annual series.
pub mod revenue;
pub mod summary;

use tracing::info;

pub use generation::GenerationTable;
pub use params::ProjectionParams;
pub use revenue::{AnnualRecord, AnnualSeries};
pub use summary::Summary;

use crate::error::ProjectionError;
use crate::portfolio::Portfolio;

/// Everything derived from one projection run.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub scale_factor: f64,
    pub table: GenerationTable,
    pub series: AnnualSeries,
    pub summary: Summary,
}

/// Runs the full pipeline: validation, calibration, generation grid,
/// revenue series and summary.
///
/// Inputs are only read; the same inputs always give the same result.
///
/// # Errors
///
/// Returns a validation error for bad parameters or an empty portfolio, and
/// an arithmetic error if the reference-year calibration divides by zero or
/// any derived value is not finite. Nothing is returned on failure.
pub fn project(
    portfolio: &Portfolio,
    params: &ProjectionParams,
) -> Result<Projection, ProjectionError> {
    params.validate()?;
    if portfolio.is_empty() {
        return Err(ProjectionError::validation(
            "portfolio",
            "must contain at least one asset",
        ));
    }

    info!(
        assets = portfolio.len(),
        capacity_mw = portfolio.total_capacity_mw(),
        start_year = params.start_year,
        end_year = params.end_year,
        "projecting portfolio revenue"
    );

    let scale_factor = generation::scale_factor(portfolio, params)?;
    let table = GenerationTable::build(portfolio, params, scale_factor);
    let series = AnnualSeries::derive(&table.annual_totals(), params)?;
    let summary = Summary::from_series(&series, params, scale_factor);

    info!(
        npv_m = summary.npv_m,
        ratio = summary.npv_to_reference_ratio,
        "projection complete"
    );

    Ok(Projection {
        scale_factor,
        table,
        series,
        summary,
    })
}
