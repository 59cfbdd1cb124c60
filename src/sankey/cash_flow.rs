//! Operating and investing inflows pooled as available cash, then spent on
//! financing or retained as the net change in cash.

use super::{MetricRow, SankeyDiagram, Statement};
use crate::error::ProjectionError;

pub const OPERATING: &str = "Operating Cash Flow";
pub const CASH_AVAILABLE: &str = "Cash Available";
pub const INVESTING: &str = "Investing";
pub const FINANCING: &str = "Financing";

const OPERATING_KEYWORD: &str = "Operating activities";
pub const INVESTING_KEYWORDS: [&str; 3] =
    ["Acquisition", "Disposal", "Repayment of shareholder loan"];
pub const FINANCING_KEYWORDS: [&str; 4] =
    ["buyback", "Amounts drawn", "Debt Interest", "Dividends"];
pub const NET_CHANGE_KEYWORDS: [&str; 2] = ["Net increase", "Net change"];

/// Metric names shown under a clearer label.
const RENAMED: [(&str, &str); 1] = [("Debt interest", "Debt Interest Payments")];

fn display_label(metric: &str) -> &str {
    RENAMED
        .iter()
        .find(|(from, _)| *from == metric)
        .map_or(metric, |&(_, to)| to)
}

/// Adds a `from -> to` link with the magnitude of the group total, then a
/// `hub -> metric` link for each non-zero row. A zero total adds nothing.
fn add_group(
    diagram: &mut SankeyDiagram,
    rows: &[&MetricRow],
    (from, to): (&str, &str),
    hub: &str,
) {
    let total: f64 = rows.iter().map(|r| r.value).sum();
    if total == 0.0 {
        return;
    }
    diagram.link(from, to, total.abs());
    for row in rows.iter().filter(|r| r.value != 0.0) {
        diagram.link(hub, display_label(&row.metric), row.value.abs());
    }
}

/// Builds the cash-flow diagram.
///
/// Every value is drawn by magnitude. Investing rows are grouped under
/// `Investing -> Cash Available`, financing rows under
/// `Cash Available -> Financing`, and net-change rows hang directly off
/// `Cash Available`. A row may belong to more than one group.
///
/// # Errors
///
/// Returns a validation error if no operating-activities row is present.
pub fn cash_flow_flows(
    statement: &Statement,
    title: impl Into<String>,
) -> Result<SankeyDiagram, ProjectionError> {
    let [operating] = statement.require_all([OPERATING_KEYWORD])?;

    let mut diagram = SankeyDiagram::new(title);
    diagram.link(OPERATING, CASH_AVAILABLE, operating.abs());

    let investing: Vec<&MetricRow> = statement.matching_any(&INVESTING_KEYWORDS).collect();
    add_group(&mut diagram, &investing, (INVESTING, CASH_AVAILABLE), INVESTING);

    let financing: Vec<&MetricRow> = statement.matching_any(&FINANCING_KEYWORDS).collect();
    add_group(&mut diagram, &financing, (CASH_AVAILABLE, FINANCING), FINANCING);

    for row in statement.matching_any(&NET_CHANGE_KEYWORDS) {
        if row.value != 0.0 {
            diagram.link(CASH_AVAILABLE, display_label(&row.metric), row.value.abs());
        }
    }
    Ok(diagram)
}
