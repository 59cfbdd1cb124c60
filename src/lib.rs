//! Wind portfolio revenue projection: synthetic portfolios, degraded
//! generation, discounted net revenue and NPV, plus Sankey diagrams of
//! balance-sheet and cash-flow statements.

/// SVG chart rendering.
pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod portfolio;
pub mod projection;
pub mod reporting;
pub mod sankey;

pub use error::ProjectionError;
