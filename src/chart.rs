//! SVG chart of projected net revenue against the reference value.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::projection::{AnnualSeries, Summary};

const SIZE: (u32, u32) = (1200, 700);
const NET_FILL: RGBColor = RGBColor(0x1a, 0x98, 0x50);
const NET_EDGE: RGBColor = RGBColor(0x0b, 0x3d, 0x2e);
const CUMULATIVE: RGBColor = RGBColor(0x28, 0x35, 0x93);
const REFERENCE: RGBColor = RGBColor(0xd7, 0x30, 0x27);

/// Renders the chart to an SVG string.
///
/// Net revenue is drawn as bars, the cumulative discounted cash flow as a
/// line with markers and the reference value as a horizontal line.
/// `key_figures` and `assumptions` are drawn as text blocks on the right.
///
/// # Errors
///
/// Returns an error if the series is empty or drawing fails.
pub fn render_svg(
    series: &AnnualSeries,
    summary: &Summary,
    key_figures: &[String],
    assumptions: &[String],
) -> Result<String> {
    let records = series.records();
    let (first, last) = match (records.first(), records.last()) {
        (Some(f), Some(l)) => (f.year as f64, l.year as f64),
        _ => anyhow::bail!("cannot chart an empty series"),
    };
    let y_max = records
        .iter()
        .map(|r| r.net_revenue_m.max(r.cumulative_discounted_cash_flow_m))
        .fold(summary.reference_value_m, f64::max)
        * 1.1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Projected Net Revenue from Existing Assets vs. Reference Value",
                ("sans-serif", 24).into_font(),
            )
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((first - 0.6)..(last + 0.6), 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("£ million")
            .x_labels(records.len())
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        chart
            .draw_series(records.iter().map(|r| {
                let x = r.year as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, r.net_revenue_m)], NET_FILL.filled())
            }))?
            .label("Net revenue")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], NET_FILL.filled()));
        chart.draw_series(records.iter().map(|r| {
            let x = r.year as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, r.net_revenue_m)], NET_EDGE)
        }))?;

        chart
            .draw_series(LineSeries::new(
                records
                    .iter()
                    .map(|r| (r.year as f64, r.cumulative_discounted_cash_flow_m)),
                CUMULATIVE.stroke_width(2),
            ))?
            .label("Cumulative discounted cash flow (NPV)")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], CUMULATIVE));
        chart.draw_series(records.iter().map(|r| {
            Circle::new(
                (r.year as f64, r.cumulative_discounted_cash_flow_m),
                3,
                CUMULATIVE.filled(),
            )
        }))?;

        chart
            .draw_series(LineSeries::new(
                vec![
                    (first - 0.6, summary.reference_value_m),
                    (last + 0.6, summary.reference_value_m),
                ],
                REFERENCE.stroke_width(2),
            ))?
            .label(format!("Reference value £{:.0}m", summary.reference_value_m))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], REFERENCE));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        let font = ("sans-serif", 14).into_font();
        let blocks = [(key_figures, 250), (assumptions, 420)];
        for (lines, top) in blocks {
            for (i, line) in lines.iter().enumerate() {
                root.draw(&Text::new(
                    line.clone(),
                    (720, top + 20 * i as i32),
                    font.clone(),
                ))?;
            }
        }

        root.present()?;
    }
    Ok(svg)
}

/// Renders the chart and writes it to `path`.
///
/// # Errors
///
/// Returns an error if rendering or writing the file fails.
pub fn export_chart(
    series: &AnnualSeries,
    summary: &Summary,
    key_figures: &[String],
    assumptions: &[String],
    path: &Path,
) -> Result<()> {
    let svg = render_svg(series, summary, key_figures, assumptions)?;
    fs::write(path, svg).with_context(|| format!("cannot write chart to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ProjectionParams;

    #[test]
    fn renders_svg_with_text_blocks() {
        let params = ProjectionParams {
            start_year: 2025,
            end_year: 2030,
            ..ProjectionParams::baseline()
        };
        let series = AnnualSeries::derive(&[5000.0; 6], &params).expect("valid inputs");
        let summary = Summary::from_series(&series, &params, 1.0);
        let svg = render_svg(
            &series,
            &summary,
            &["Key figures:".to_string()],
            &["Assumptions:".to_string()],
        );
        let svg = svg.expect("chart renders");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Key figures:"));
        assert!(svg.contains("Assumptions:"));
    }

    #[test]
    fn empty_series_is_an_error() {
        let params = ProjectionParams::baseline();
        let series = AnnualSeries::default();
        let summary = Summary::from_series(&series, &params, 1.0);
        assert!(render_svg(&series, &summary, &[], &[]).is_err());
    }
}
