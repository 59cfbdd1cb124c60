//! Text and JSON reports of a projection.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::portfolio::GeneratorParams;
use crate::portfolio::generator::BUCKET_NAMES;
use crate::projection::{AnnualSeries, ProjectionParams, Summary};

/// Short key-figure lines, as shown on the chart.
pub fn key_figure_lines(summary: &Summary) -> Vec<String> {
    vec![
        "Key figures:".to_string(),
        format!(
            "NPV of net cash flows ({}-{}): £{:.0}m",
            summary.start_year, summary.end_year, summary.npv_m
        ),
        format!(
            "Total undiscounted net revenue: £{:.0}m",
            summary.total_net_revenue_m
        ),
        format!("Reference value: £{:.0}m", summary.reference_value_m),
        format!(
            "Implied NPV / reference value: {:.2}x",
            summary.npv_to_reference_ratio
        ),
    ]
}

/// Assumption lines describing the inputs of a run.
///
/// The age-distribution line is only included for generated portfolios.
pub fn assumption_lines(
    params: &ProjectionParams,
    generator: Option<&GeneratorParams>,
) -> Vec<String> {
    let pct = |x: f64| x * 100.0;
    let mut lines = vec![
        "Assumptions:".to_string(),
        format!(
            "Avg price £{:.0}/MWh; O&M {:.0}%, Mgmt {:.0}%",
            params.price_per_mwh,
            pct(params.om_cost_ratio),
            pct(params.mgmt_fee_ratio)
        ),
        format!(
            "Target CF {:.0}% (scaled to {:.0} GWh in {})",
            pct(params.target_capacity_factor),
            params.reference_generation_gwh,
            params.reference_year
        ),
        format!(
            "Asset life {}y; degradation {:.1}%/y",
            params.life_years,
            pct(params.degradation_rate)
        ),
    ];
    if let Some(g) = generator {
        let buckets: Vec<String> = g
            .age_buckets
            .iter()
            .zip(BUCKET_NAMES)
            .map(|(b, name)| {
                format!(
                    "{name} {}-{}y {:.0}%",
                    b.min_age,
                    b.max_age.saturating_sub(1),
                    pct(b.probability)
                )
            })
            .collect();
        lines.push(format!("Age distribution: {}", buckets.join(", ")));
    }
    lines.push(format!("Discount rate {:.0}%", pct(params.discount_rate)));
    lines
}

/// Prints the per-year table followed by the key figures.
pub fn print_report(series: &AnnualSeries, summary: &Summary) {
    for r in series.records() {
        println!("{r}");
    }
    println!("\n{summary}");
}

/// Writes the summary as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_summary_json(summary: &Summary, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes the summary JSON to a file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_summary_json(summary: &Summary, path: &Path) -> io::Result<()> {
    let file = io::BufWriter::new(File::create(path)?);
    write_summary_json(summary, file)
}
