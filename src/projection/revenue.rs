//! Revenue, discounting and the derived annual series.

use std::fmt;

use super::params::ProjectionParams;
use crate::error::ProjectionError;

/// Gross revenue (£m) from `generation_gwh` sold at `price_per_mwh` (£/MWh).
pub fn gross_revenue_m(generation_gwh: f64, price_per_mwh: f64) -> f64 {
    generation_gwh * price_per_mwh / 1000.0
}

/// Discount factor for `year`, relative to the start of the analysis window.
///
/// # Errors
///
/// Returns a domain error for years outside the analysis window.
pub fn discount_factor(year: i32, params: &ProjectionParams) -> Result<f64, ProjectionError> {
    let offset = params.year_offset(year)?;
    let growth = 1.0 + params.discount_rate;
    let compounded = match i32::try_from(offset) {
        Ok(offset) => growth.powi(offset),
        Err(_) => growth.powf(offset as f64),
    };
    Ok(1.0 / compounded)
}

/// One year of the projection. Money in £m, energy in GWh.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualRecord {
    pub year: i32,
    pub generation_gwh: f64,
    pub gross_revenue_m: f64,
    pub net_revenue_m: f64,
    pub discount_factor: f64,
    /// `net_revenue_m * discount_factor`.
    pub discounted_cash_flow_m: f64,
    /// Running sum of `discounted_cash_flow_m` up to and including this year.
    pub cumulative_discounted_cash_flow_m: f64,
}

impl AnnualRecord {
    fn values(&self) -> [f64; 6] {
        [
            self.generation_gwh,
            self.gross_revenue_m,
            self.net_revenue_m,
            self.discount_factor,
            self.discounted_cash_flow_m,
            self.cumulative_discounted_cash_flow_m,
        ]
    }
}

impl fmt::Display for AnnualRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | gen {:>8.1} GWh | gross £{:>7.1}m | net £{:>7.1}m | df {:.4} | dcf £{:>6.1}m | cum £{:>7.1}m",
            self.year,
            self.generation_gwh,
            self.gross_revenue_m,
            self.net_revenue_m,
            self.discount_factor,
            self.discounted_cash_flow_m,
            self.cumulative_discounted_cash_flow_m
        )
    }
}

/// Year-ordered projection records, derived once from annual generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnualSeries {
    records: Vec<AnnualRecord>,
}

impl AnnualSeries {
    /// Derives revenue and discounting from per-year generation.
    ///
    /// `generation_gwh[i]` is the generation of `params.start_year + i`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the generation length does not match
    /// the analysis window, and an arithmetic error if any derived value is
    /// not finite or the cumulative cash flow decreases while all net
    /// revenues are non-negative.
    pub fn derive(
        generation_gwh: &[f64],
        params: &ProjectionParams,
    ) -> Result<Self, ProjectionError> {
        if generation_gwh.len() != params.year_count() {
            return Err(ProjectionError::validation(
                "generation_gwh",
                format!(
                    "expected {} years of generation, got {}",
                    params.year_count(),
                    generation_gwh.len()
                ),
            ));
        }

        let net_ratio = params.net_revenue_ratio();
        let mut records = Vec::with_capacity(generation_gwh.len());
        let mut cumulative = 0.0;

        for (year, &generation) in params.years().zip(generation_gwh) {
            let gross = gross_revenue_m(generation, params.price_per_mwh);
            let net = gross * net_ratio;
            let df = discount_factor(year, params)?;
            let dcf = net * df;
            cumulative += dcf;
            let record = AnnualRecord {
                year,
                generation_gwh: generation,
                gross_revenue_m: gross,
                net_revenue_m: net,
                discount_factor: df,
                discounted_cash_flow_m: dcf,
                cumulative_discounted_cash_flow_m: cumulative,
            };
            if record.values().iter().any(|v| !v.is_finite()) {
                return Err(ProjectionError::arithmetic(format!(
                    "non-finite value in projection for {year}: {record:?}"
                )));
            }
            records.push(record);
        }

        let series = Self { records };
        if series.net_revenue_non_negative() && !series.cumulative_is_non_decreasing() {
            return Err(ProjectionError::arithmetic(
                "cumulative discounted cash flow decreased despite non-negative net revenue",
            ));
        }
        Ok(series)
    }

    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record for `year`, if it lies in the series.
    pub fn get(&self, year: i32) -> Option<&AnnualRecord> {
        let first = self.records.first()?.year;
        let offset = usize::try_from(i64::from(year) - i64::from(first)).ok()?;
        self.records.get(offset)
    }

    /// Sum of discounted net cash flows (£m).
    pub fn npv_m(&self) -> f64 {
        self.records.iter().map(|r| r.discounted_cash_flow_m).sum()
    }

    /// Sum of undiscounted net revenue (£m).
    pub fn total_net_revenue_m(&self) -> f64 {
        self.records.iter().map(|r| r.net_revenue_m).sum()
    }

    /// Sum of generation (GWh).
    pub fn total_generation_gwh(&self) -> f64 {
        self.records.iter().map(|r| r.generation_gwh).sum()
    }

    pub fn net_revenue_non_negative(&self) -> bool {
        self.records.iter().all(|r| r.net_revenue_m >= 0.0)
    }

    pub fn cumulative_is_non_decreasing(&self) -> bool {
        self.records.windows(2).all(|w| {
            w[1].cumulative_discounted_cash_flow_m >= w[0].cumulative_discounted_cash_flow_m
        })
    }
}
