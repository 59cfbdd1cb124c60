use crate::error::ProjectionError;

/// One `Metric`/`Value` row of a statement extract.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub metric: String,
    pub value: f64,
}

impl MetricRow {
    pub fn new(metric: impl Into<String>, value: f64) -> Self {
        Self {
            metric: metric.into(),
            value,
        }
    }

    /// Case-insensitive substring match on the metric name.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.metric.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// Ordered rows of a balance-sheet or cash-flow extract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    rows: Vec<MetricRow>,
}

impl Statement {
    /// # Errors
    ///
    /// Returns a validation error for the first non-finite value.
    pub fn new(rows: Vec<MetricRow>) -> Result<Self, ProjectionError> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| !r.value.is_finite()) {
            return Err(ProjectionError::validation(
                format!("statement[{i}].value"),
                format!("\"{}\" must be finite, got {}", row.metric, row.value),
            ));
        }
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// First row whose metric mentions `keyword`.
    pub fn find(&self, keyword: &str) -> Option<&MetricRow> {
        self.rows.iter().find(|r| r.mentions(keyword))
    }

    /// Rows mentioning any of `keywords`, in statement order.
    pub fn matching_any<'a>(
        &'a self,
        keywords: &'a [&'a str],
    ) -> impl Iterator<Item = &'a MetricRow> + 'a {
        self.rows
            .iter()
            .filter(move |r| keywords.iter().any(|k| r.mentions(k)))
    }

    /// Values of the first rows mentioning each keyword.
    ///
    /// # Errors
    ///
    /// Returns one validation error listing every keyword with no match.
    pub fn require_all<const N: usize>(
        &self,
        keywords: [&str; N],
    ) -> Result<[f64; N], ProjectionError> {
        let found = keywords.map(|k| self.find(k).map(|r| r.value));
        let missing: Vec<&str> = keywords
            .iter()
            .zip(&found)
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| *k)
            .collect();
        if !missing.is_empty() {
            return Err(ProjectionError::validation(
                "statement.metric",
                format!("missing metrics: {}", missing.join(", ")),
            ));
        }
        Ok(found.map(|v| v.unwrap_or_default()))
    }
}

/// Parses a reported amount, ignoring thousands separators.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    cleaned.trim().parse().ok()
}
