//! Sankey flow diagrams of balance-sheet and cash-flow statements.
//!
//! A [`Statement`] of `Metric`/`Value` rows is turned into a node/link
//! [`SankeyDiagram`], which can be exported as CSV or JSON through
//! [`crate::io::export`] and drawn as SVG by [`render`].

pub mod balance_sheet;
pub mod cash_flow;
pub mod render;
pub mod statement;

use serde::Serialize;

use crate::error::ProjectionError;

pub use balance_sheet::balance_sheet_flows;
pub use cash_flow::cash_flow_flows;
pub use statement::{MetricRow, Statement};

/// Which statement layout a metric file follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    BalanceSheet,
    CashFlow,
}

impl StatementKind {
    /// Names accepted on the command line.
    pub const NAMES: [&'static str; 2] = ["balance-sheet", "cash-flow"];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "balance-sheet" => Some(Self::BalanceSheet),
            "cash-flow" => Some(Self::CashFlow),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance-sheet",
            Self::CashFlow => "cash-flow",
        }
    }

    /// Human-readable title prefix.
    pub fn label(self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance Sheet",
            Self::CashFlow => "Cash Flow",
        }
    }
}

/// A weighted flow between two nodes, by node index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

/// Nodes and links of one diagram, in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SankeyDiagram {
    pub title: String,
    nodes: Vec<String>,
    links: Vec<SankeyLink>,
}

impl SankeyDiagram {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Index of the node labelled `label`, adding it if needed.
    pub fn node(&mut self, label: &str) -> usize {
        match self.nodes.iter().position(|n| n == label) {
            Some(index) => index,
            None => {
                self.nodes.push(label.to_string());
                self.nodes.len() - 1
            }
        }
    }

    /// Adds a flow of `value` from `source` to `target`.
    pub fn link(&mut self, source: &str, target: &str, value: f64) {
        let source = self.node(source);
        let target = self.node(target);
        self.links.push(SankeyLink {
            source,
            target,
            value,
        });
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn links(&self) -> &[SankeyLink] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    pub fn inflow(&self, index: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.target == index)
            .map(|l| l.value)
            .sum()
    }

    pub fn outflow(&self, index: usize) -> f64 {
        self.links
            .iter()
            .filter(|l| l.source == index)
            .map(|l| l.value)
            .sum()
    }

    /// Throughput of a node: the larger of its inflow and outflow.
    pub fn node_value(&self, index: usize) -> f64 {
        self.inflow(index).max(self.outflow(index))
    }

    /// Links as `(source label, target label, value)`.
    pub fn labelled_links(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.links.iter().map(|l| {
            (
                self.nodes[l.source].as_str(),
                self.nodes[l.target].as_str(),
                l.value,
            )
        })
    }
}

/// Derives the diagram for a statement of the given kind.
///
/// # Errors
///
/// Returns a validation error if metrics the layout needs are missing or
/// unusable.
pub fn build(
    kind: StatementKind,
    statement: &Statement,
    title: impl Into<String>,
) -> Result<SankeyDiagram, ProjectionError> {
    match kind {
        StatementKind::BalanceSheet => balance_sheet_flows(statement, title),
        StatementKind::CashFlow => cash_flow_flows(statement, title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_interned_in_first_use_order() {
        let mut d = SankeyDiagram::new("t");
        d.link("a", "hub", 3.0);
        d.link("b", "hub", 2.0);
        d.link("hub", "a", 1.0);
        assert_eq!(d.nodes(), ["a", "hub", "b"]);
        assert_eq!(d.links().len(), 3);
        assert_eq!(d.links()[2], SankeyLink { source: 1, target: 0, value: 1.0 });
    }

    #[test]
    fn node_value_is_max_of_inflow_and_outflow() {
        let mut d = SankeyDiagram::new("t");
        d.link("a", "hub", 3.0);
        d.link("b", "hub", 2.0);
        d.link("hub", "c", 4.0);
        let hub = d.node("hub");
        assert_eq!(d.inflow(hub), 5.0);
        assert_eq!(d.outflow(hub), 4.0);
        assert_eq!(d.node_value(hub), 5.0);
        let c = d.node("c");
        assert_eq!(d.node_value(c), 4.0);
    }

    #[test]
    fn kind_names_round_trip() {
        for name in StatementKind::NAMES {
            let kind = StatementKind::from_name(name).expect("known kind");
            assert_eq!(kind.name(), name);
        }
        assert_eq!(StatementKind::from_name("income"), None);
    }
}
