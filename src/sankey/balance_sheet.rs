//! Funding sources flowing through the balance sheet into the assets they finance.

use super::{SankeyDiagram, Statement};
use crate::error::ProjectionError;

/// Central node joining both sides of the balance sheet.
pub const HUB: &str = "Balance Sheet";

/// `(metric keyword, node label)` for the funding side, left of the hub.
pub const FUNDING: [(&str, &str); 3] = [
    ("Equity", "Net Assets / Equity"),
    ("Loans", "Loans & Borrowings (non-current)"),
    ("Payables", "Payables (current liabilities)"),
];

/// `(metric keyword, node label)` for the asset side, right of the hub.
pub const HOLDINGS: [(&str, &str); 4] = [
    ("Investments at fair value", "Investments at fair value"),
    ("Interest rate swaps", "Interest rate swaps (non-current)"),
    ("Receivables", "Receivables (Current Assets)"),
    ("Cash & cash equivalents", "Cash & cash equivalents"),
];

/// Builds the balance-sheet diagram: funding → hub → holdings.
///
/// Each figure is the first row whose metric mentions the keyword.
///
/// # Errors
///
/// Returns a validation error naming every missing metric, or the first
/// negative figure (a band cannot have negative width).
pub fn balance_sheet_flows(
    statement: &Statement,
    title: impl Into<String>,
) -> Result<SankeyDiagram, ProjectionError> {
    let funding = statement.require_all(FUNDING.map(|(k, _)| k))?;
    let holdings = statement.require_all(HOLDINGS.map(|(k, _)| k))?;

    let keywords = FUNDING.iter().chain(&HOLDINGS).map(|(k, _)| *k);
    for (keyword, value) in keywords.zip(funding.into_iter().chain(holdings)) {
        if value < 0.0 {
            return Err(ProjectionError::validation(
                format!("statement.{keyword}"),
                format!("must be >= 0 to draw as a flow, got {value}"),
            ));
        }
    }

    let mut diagram = SankeyDiagram::new(title);
    for ((_, label), value) in FUNDING.iter().zip(funding) {
        diagram.link(label, HUB, value);
    }
    for ((_, label), value) in HOLDINGS.iter().zip(holdings) {
        diagram.link(HUB, label, value);
    }
    Ok(diagram)
}
