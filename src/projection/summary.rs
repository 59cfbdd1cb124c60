//! Scalar summary of a projection.

use std::fmt;

use serde::Serialize;

use super::params::ProjectionParams;
use super::revenue::AnnualSeries;

/// Headline figures derived from an [`AnnualSeries`].
///
/// Computed post-hoc from the series so the reported totals always agree
/// with the per-year records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub start_year: i32,
    pub end_year: i32,
    /// Net present value of net cash flows (£m).
    pub npv_m: f64,
    /// Undiscounted net revenue over the window (£m).
    pub total_net_revenue_m: f64,
    /// Generation over the window (GWh).
    pub total_generation_gwh: f64,
    /// Comparison value, e.g. market capitalisation (£m).
    pub reference_value_m: f64,
    /// `npv_m / reference_value_m`.
    pub npv_to_reference_ratio: f64,
    /// Calibration factor applied to modeled generation.
    pub scale_factor: f64,
}

impl Summary {
    /// Summarises `series`. `params.reference_value` is assumed validated (> 0).
    pub fn from_series(series: &AnnualSeries, params: &ProjectionParams, scale_factor: f64) -> Self {
        let npv_m = series.npv_m();
        Self {
            start_year: params.start_year,
            end_year: params.end_year,
            npv_m,
            total_net_revenue_m: series.total_net_revenue_m(),
            total_generation_gwh: series.total_generation_gwh(),
            reference_value_m: params.reference_value,
            npv_to_reference_ratio: npv_m / params.reference_value,
            scale_factor,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Key figures ---")?;
        writeln!(
            f,
            "Analysis window:         {}-{}",
            self.start_year, self.end_year
        )?;
        writeln!(f, "NPV of net cash flows:   £{:.1}m", self.npv_m)?;
        writeln!(f, "Total net revenue:       £{:.1}m", self.total_net_revenue_m)?;
        writeln!(
            f,
            "Total generation:        {:.1} GWh",
            self.total_generation_gwh
        )?;
        writeln!(f, "Reference value:         £{:.1}m", self.reference_value_m)?;
        writeln!(f, "NPV / reference value:   {:.2}x", self.npv_to_reference_ratio)?;
        write!(f, "Scale factor:            {:.4}", self.scale_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_and_totals() {
        let params = ProjectionParams {
            start_year: 2025,
            end_year: 2026,
            discount_rate: 0.0,
            reference_value: 100.0,
            ..ProjectionParams::baseline()
        };
        let series = AnnualSeries::derive(&[1000.0, 1000.0], &params).expect("valid inputs");
        let s = Summary::from_series(&series, &params, 1.0);
        // 2 years * 65 £m * 0.88, undiscounted
        assert!((s.npv_m - 114.4).abs() < 1e-9);
        assert!((s.total_net_revenue_m - s.npv_m).abs() < 1e-12);
        assert!((s.npv_to_reference_ratio - 1.144).abs() < 1e-12);
        assert!((s.total_generation_gwh - 2000.0).abs() < 1e-12);
    }

    #[test]
    fn display_lists_headline_figures() {
        let params = ProjectionParams {
            start_year: 2025,
            end_year: 2025,
            ..ProjectionParams::baseline()
        };
        let series = AnnualSeries::derive(&[1000.0], &params).expect("valid inputs");
        let text = Summary::from_series(&series, &params, 1.0).to_string();
        assert!(text.contains("NPV of net cash flows:   £57.2m"));
        assert!(text.contains("Analysis window:         2025-2025"));
    }
}
