//! CSV export for the annual series, the generation grid and the portfolio,
//! plus Sankey link tables as CSV or JSON.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use crate::portfolio::Portfolio;
use crate::projection::{AnnualRecord, GenerationTable};
use crate::sankey::SankeyDiagram;

/// Column header of the annual series export.
pub const SERIES_HEADER: &str = "year,generation_gwh,gross_revenue_m,net_revenue_m,\
                                 discount_factor,discounted_cash_flow_m,\
                                 cumulative_discounted_cash_flow_m";

fn create(path: &Path) -> io::Result<io::BufWriter<File>> {
    Ok(io::BufWriter::new(File::create(path)?))
}

/// Exports the annual series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(records: &[AnnualRecord], path: &Path) -> io::Result<()> {
    write_series_csv(records, create(path)?)
}

/// Writes the annual series as CSV to any writer.
///
/// One header row, then one row per year. Output is deterministic for
/// identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(records: &[AnnualRecord], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SERIES_HEADER.split(',').map(str::trim))?;

    for r in records {
        wtr.write_record(&[
            r.year.to_string(),
            format!("{:.6}", r.generation_gwh),
            format!("{:.6}", r.gross_revenue_m),
            format!("{:.6}", r.net_revenue_m),
            format!("{:.8}", r.discount_factor),
            format!("{:.6}", r.discounted_cash_flow_m),
            format!("{:.6}", r.cumulative_discounted_cash_flow_m),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the per-asset generation grid to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_generation_csv(table: &GenerationTable, path: &Path) -> io::Result<()> {
    write_generation_csv(table, create(path)?)
}

/// Writes the generation grid as CSV: a `year` column, then one column per asset.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_generation_csv(table: &GenerationTable, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let mut header = Vec::with_capacity(table.asset_count() + 1);
    header.push("year");
    header.extend(table.asset_ids().iter().map(String::as_str));
    wtr.write_record(&header)?;

    for year in table.years() {
        let row = table
            .row(year)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(year.to_string());
        record.extend(row.iter().map(|v| format!("{v:.6}")));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the portfolio (`asset,mw,commission_year`) to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_portfolio_csv(portfolio: &Portfolio, path: &Path) -> io::Result<()> {
    write_portfolio_csv(portfolio, create(path)?)
}

/// Writes the portfolio as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_portfolio_csv(portfolio: &Portfolio, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for asset in portfolio.assets() {
        wtr.serialize(asset)?;
    }
    wtr.flush()?;
    Ok(())
}

/// One exported Sankey link, labelled by node name.
#[derive(Serialize)]
struct LinkRow<'a> {
    source: &'a str,
    target: &'a str,
    value: f64,
}

/// Exports the links of a Sankey diagram to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_sankey_links_csv(diagram: &SankeyDiagram, path: &Path) -> io::Result<()> {
    write_sankey_links_csv(diagram, create(path)?)
}

/// Writes `source,target,value` rows, one per link in insertion order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_sankey_links_csv(diagram: &SankeyDiagram, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for (source, target, value) in diagram.labelled_links() {
        wtr.serialize(LinkRow {
            source,
            target,
            value,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the diagram (title, node labels, index links) as JSON.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_sankey_json(diagram: &SankeyDiagram, path: &Path) -> io::Result<()> {
    write_sankey_json(diagram, create(path)?)
}

/// Writes the diagram as pretty-printed JSON.
///
/// # Errors
///
/// Returns an `io::Error` if serialization or writing fails.
pub fn write_sankey_json(diagram: &SankeyDiagram, mut writer: impl Write) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, diagram)?;
    writeln!(writer)?;
    writer.flush()
}
