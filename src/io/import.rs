//! CSV import of portfolio templates and `Metric`/`Value` statements.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ProjectionError;
use crate::portfolio::{Asset, Portfolio};
use crate::sankey::statement::{MetricRow, Statement, parse_amount};

/// Failure while loading a portfolio or statement file.
#[derive(Debug)]
pub enum ImportError {
    /// The file could not be read or a row did not parse.
    Csv(csv::Error),
    /// The rows parsed but do not form a valid portfolio or statement.
    Invalid(ProjectionError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::Invalid(e) => write!(f, "invalid input: {e}"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

impl From<ProjectionError> for ImportError {
    fn from(e: ProjectionError) -> Self {
        Self::Invalid(e)
    }
}

/// Loads a portfolio from a CSV file with columns `asset,mw,commission_year`.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read, a row is malformed,
/// or the assets fail portfolio validation.
pub fn import_portfolio_csv(path: &Path) -> Result<Portfolio, ImportError> {
    let file = File::open(path).map_err(csv::Error::from)?;
    read_portfolio_csv(file)
}

/// Reads a portfolio from any CSV source with a header row.
///
/// # Errors
///
/// As [`import_portfolio_csv`].
pub fn read_portfolio_csv(reader: impl Read) -> Result<Portfolio, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let assets = rdr
        .deserialize::<Asset>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Portfolio::new(assets)?)
}

/// Loads a statement extract with a `Metric` column and a value column.
///
/// # Errors
///
/// Returns an `ImportError` if the file cannot be read, a column is
/// missing or a value is not a number.
pub fn import_statement_csv(path: &Path) -> Result<Statement, ImportError> {
    let file = File::open(path).map_err(csv::Error::from)?;
    read_statement_csv(file)
}

/// Reads a statement from any CSV source.
///
/// Headers are trimmed. The value column is the first whose header contains
/// `Value` (e.g. `Value (£m)`); values may use `,` thousands separators.
///
/// # Errors
///
/// As [`import_statement_csv`].
pub fn read_statement_csv(reader: impl Read) -> Result<Statement, ImportError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let metric_col = headers
        .iter()
        .position(|h| h == "Metric")
        .ok_or_else(|| ProjectionError::validation("statement.Metric", "missing `Metric` column"))?;
    let value_col = headers
        .iter()
        .position(|h| h.contains("Value"))
        .ok_or_else(|| ProjectionError::validation("statement.Value", "missing `Value` column"))?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let metric = record.get(metric_col).unwrap_or_default();
        let raw = record.get(value_col).unwrap_or_default();
        let value = parse_amount(raw).ok_or_else(|| {
            ProjectionError::validation(
                format!("statement[{i}].value"),
                format!("\"{raw}\" for \"{metric}\" is not a number"),
            )
        })?;
        rows.push(MetricRow::new(metric, value));
    }
    Ok(Statement::new(rows)?)
}
