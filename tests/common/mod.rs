//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use revenue_projector::config::ScenarioConfig;
use revenue_projector::portfolio::{Asset, GeneratorParams, Portfolio, generate_portfolio};
use revenue_projector::projection::ProjectionParams;

/// Baseline generator parameters (120 assets, 1980 MW, seed 7).
pub fn baseline_generator() -> GeneratorParams {
    ScenarioConfig::baseline().generator_params()
}

/// Baseline projection parameters (2025-2049, £65/MWh, 8%).
pub fn baseline_params() -> ProjectionParams {
    ScenarioConfig::baseline().projection_params()
}

/// The baseline synthetic portfolio.
pub fn baseline_portfolio() -> Portfolio {
    generate_portfolio(&baseline_generator()).expect("baseline generator params are valid")
}

/// One 100 MW asset commissioned in 2020, calibrated so the scale factor is 1.
///
/// Returns `(portfolio, params)` with a 2020-2050 window, CF 0.30, 25-year
/// life and 0.5%/y degradation.
pub fn single_asset_case() -> (Portfolio, ProjectionParams) {
    let portfolio =
        Portfolio::new(vec![Asset::new("A000", 100.0, 2020)]).expect("valid portfolio");
    let params = ProjectionParams {
        start_year: 2020,
        end_year: 2050,
        reference_year: 2020,
        reference_generation_gwh: 262.8,
        target_capacity_factor: 0.30,
        life_years: 25,
        degradation_rate: 0.005,
        ..ProjectionParams::baseline()
    };
    (portfolio, params)
}
