//! Integration tests for the projection pipeline on generated portfolios.

mod common;

use revenue_projector::ProjectionError;
use revenue_projector::io::export::write_portfolio_csv;
use revenue_projector::io::import::read_portfolio_csv;
use revenue_projector::portfolio::{Asset, Portfolio, generate_portfolio};
use revenue_projector::projection::{ProjectionParams, project};

#[test]
fn generation_is_zero_outside_operating_life() {
    let portfolio = common::baseline_portfolio();
    let params = common::baseline_params();
    let projection = project(&portfolio, &params).expect("baseline projects");

    for year in params.years() {
        for (i, asset) in portfolio.assets().iter().enumerate() {
            let value = projection.table.get(year, i).expect("in-window query");
            let age = year - asset.commission_year;
            if age < 0 || age >= params.life_years as i32 {
                assert_eq!(value, 0.0, "{} should be idle in {year}", asset.id);
            } else {
                assert!(value > 0.0, "{} should produce in {year}", asset.id);
            }
        }
    }
}

#[test]
fn same_seed_gives_byte_identical_portfolio_csv() {
    let generator = common::baseline_generator();
    let mut buf1 = Vec::new();
    let mut buf2 = Vec::new();
    write_portfolio_csv(&generate_portfolio(&generator).expect("valid"), &mut buf1)
        .expect("write succeeds");
    write_portfolio_csv(&generate_portfolio(&generator).expect("valid"), &mut buf2)
        .expect("write succeeds");
    assert!(!buf1.is_empty());
    assert_eq!(buf1, buf2);
}

#[test]
fn capacities_sum_to_configured_total() {
    let portfolio = common::baseline_portfolio();
    assert!((portfolio.total_capacity_mw() - 1980.0).abs() < 1e-6);
}

#[test]
fn baseline_scale_factor_matches_nameplate_calibration() {
    let portfolio = common::baseline_portfolio();
    let params = common::baseline_params();
    let projection = project(&portfolio, &params).expect("baseline projects");
    // Every generated asset operates in the reference year.
    let modeled = 1980.0 * 8760.0 * 0.31 / 1000.0;
    assert!((projection.scale_factor - 5484.0 / modeled).abs() < 1e-9);
}

#[test]
fn npv_does_not_increase_with_discount_rate() {
    let portfolio = common::baseline_portfolio();
    let mut previous = f64::INFINITY;
    for rate in [0.0, 0.02, 0.05, 0.08, 0.12, 0.20] {
        let params = ProjectionParams {
            discount_rate: rate,
            ..common::baseline_params()
        };
        let npv = project(&portfolio, &params)
            .expect("valid params")
            .summary
            .npv_m;
        assert!(npv <= previous, "NPV rose from {previous} to {npv} at rate {rate}");
        previous = npv;
    }
}

#[test]
fn zero_discount_rate_npv_equals_total_net_revenue() {
    let params = ProjectionParams {
        discount_rate: 0.0,
        ..common::baseline_params()
    };
    let summary = project(&common::baseline_portfolio(), &params)
        .expect("valid params")
        .summary;
    assert!((summary.npv_m - summary.total_net_revenue_m).abs() < 1e-6);
}

#[test]
fn single_asset_worked_example() {
    let (portfolio, params) = common::single_asset_case();
    let projection = project(&portfolio, &params).expect("valid case");
    assert!((projection.scale_factor - 1.0).abs() < 1e-12);

    let y2020 = projection.table.get_by_id(2020, "A000").expect("in window");
    let y2021 = projection.table.get_by_id(2021, "A000").expect("in window");
    assert!((y2020 - 262.8).abs() < 1e-9);
    assert!((y2021 - 262.8 * 0.995 * projection.scale_factor).abs() < 1e-9);
    // Retired at age 25.
    assert_eq!(projection.table.get_by_id(2045, "A000"), Ok(0.0));
    assert!(projection.table.get_by_id(2044, "A000").expect("in window") > 0.0);
}

#[test]
fn net_revenue_is_gross_times_net_ratio() {
    let (portfolio, params) = common::single_asset_case();
    let projection = project(&portfolio, &params).expect("valid case");
    for r in projection.series.records() {
        assert_eq!(r.net_revenue_m, r.gross_revenue_m * (1.0 - 0.10 - 0.02));
        assert!((r.gross_revenue_m - r.generation_gwh * 65.0 / 1000.0).abs() < 1e-12);
    }
}

#[test]
fn series_generation_matches_table_totals() {
    let projection =
        project(&common::baseline_portfolio(), &common::baseline_params()).expect("projects");
    let totals = projection.table.annual_totals();
    assert_eq!(projection.series.len(), 25);
    for (r, total) in projection.series.records().iter().zip(totals) {
        assert_eq!(r.generation_gwh, total);
    }
    assert!(projection.series.cumulative_is_non_decreasing());
    let last = projection
        .series
        .records()
        .last()
        .map(|r| r.cumulative_discounted_cash_flow_m)
        .expect("non-empty series");
    assert!((last - projection.summary.npv_m).abs() < 1e-9);
}

#[test]
fn excess_cost_ratios_are_rejected() {
    let params = ProjectionParams {
        om_cost_ratio: 0.6,
        mgmt_fee_ratio: 0.5,
        ..common::baseline_params()
    };
    let result = project(&common::baseline_portfolio(), &params);
    assert!(matches!(result, Err(ProjectionError::Validation { .. })));
}

#[test]
fn zero_modeled_reference_generation_is_an_arithmetic_error() {
    let portfolio =
        Portfolio::new(vec![Asset::new("A000", 50.0, 2030)]).expect("valid portfolio");
    let result = project(&portfolio, &common::baseline_params());
    assert!(matches!(result, Err(ProjectionError::Arithmetic { .. })));
}

#[test]
fn empty_portfolio_is_rejected() {
    let result = project(&Portfolio::default(), &common::baseline_params());
    assert!(matches!(result, Err(ProjectionError::Validation { .. })));
}

#[test]
fn exported_portfolio_reloads_to_same_projection() {
    let portfolio = common::baseline_portfolio();
    let mut buf = Vec::new();
    write_portfolio_csv(&portfolio, &mut buf).expect("write succeeds");
    let reloaded = read_portfolio_csv(buf.as_slice()).expect("read succeeds");
    assert_eq!(reloaded, portfolio);

    let params = common::baseline_params();
    let a = project(&portfolio, &params).expect("projects");
    let b = project(&reloaded, &params).expect("projects");
    assert_eq!(a.summary, b.summary);
}

#[test]
fn imported_minimum_commission_year_projects_as_idle_asset() {
    let csv = "asset,mw,commission_year\nA000,100,2015\nA001,10,-2147483648\n";
    let portfolio = read_portfolio_csv(csv.as_bytes()).expect("read succeeds");
    assert_eq!(portfolio.assets()[1].commission_year, i32::MIN);

    let projection = project(&portfolio, &common::baseline_params()).expect("projects");
    for year in common::baseline_params().years() {
        assert_eq!(projection.table.get_by_id(year, "A001"), Ok(0.0));
    }
    assert!(projection.summary.npv_m > 0.0);

    let ancient_csv = "asset,mw,commission_year\nA001,10,-2147483648\n";
    let only_ancient = read_portfolio_csv(ancient_csv.as_bytes()).expect("read succeeds");
    let result = project(&only_ancient, &common::baseline_params());
    assert!(matches!(result, Err(ProjectionError::Arithmetic { .. })));
}

#[test]
fn overlong_year_windows_are_rejected_before_allocation() {
    for (start_year, end_year) in [(i32::MIN, i32::MAX), (2025, 200_000_000)] {
        let params = ProjectionParams {
            start_year,
            end_year,
            ..common::baseline_params()
        };
        let err = project(&common::baseline_portfolio(), &params).err();
        assert_eq!(
            err.as_ref().and_then(ProjectionError::field),
            Some("analysis.end_year"),
            "window {start_year}..={end_year}"
        );
    }
}
