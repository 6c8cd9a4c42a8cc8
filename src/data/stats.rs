use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::loader::TableError;
use super::model::{Column, TabularDataset};

// ---------------------------------------------------------------------------
// Metric – the six summary statistics, in display order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Count,
    Sum,
    Mean,
    Median,
    Variance,
    StdDev,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::Count,
        Metric::Sum,
        Metric::Mean,
        Metric::Median,
        Metric::Variance,
        Metric::StdDev,
    ];

    /// Row label used in comparison tables.
    pub fn table_label(self) -> &'static str {
        match self {
            Metric::Count => "Nb. of Samples",
            Metric::Sum => "Sum",
            Metric::Mean => "Mean",
            Metric::Median => "Median",
            Metric::Variance => "Variance",
            Metric::StdDev => "Std Dev",
        }
    }

    /// Label used in the histogram statistics box.
    pub fn plot_label(self) -> &'static str {
        match self {
            Metric::Count => "# Samples",
            Metric::StdDev => "Std. Dev.",
            other => other.table_label(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_label())
    }
}

// ---------------------------------------------------------------------------
// StatisticsSummary
// ---------------------------------------------------------------------------

/// Descriptive statistics of one column.
///
/// `count` is the number of rows in the column. The other metrics are taken
/// over its numeric cells only; undefined values (mean of nothing, variance
/// of a single value) are NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsSummary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
}

impl StatisticsSummary {
    pub fn from_column(column: &Column) -> Self {
        let mut summary = Self::from_values(&column.numeric_values());
        summary.count = column.values.len();
        summary
    }

    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        let sum: f64 = values.iter().sum();
        let mean = if n > 0 { sum / n as f64 } else { f64::NAN };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = match n {
            0 => f64::NAN,
            _ if n % 2 == 0 => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0,
            _ => sorted[n / 2],
        };

        // Unbiased estimator: squared deviations over n - 1.
        let variance = if n > 1 {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64
        } else {
            f64::NAN
        };

        StatisticsSummary {
            count: n,
            sum,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Count => self.count as f64,
            Metric::Sum => self.sum,
            Metric::Mean => self.mean,
            Metric::Median => self.median,
            Metric::Variance => self.variance,
            Metric::StdDev => self.std_dev,
        }
    }
}

/// Statistics of a named column of `dataset`.
pub fn column_statistics(
    dataset: &TabularDataset,
    column: &str,
) -> Result<StatisticsSummary, TableError> {
    dataset
        .column(column)
        .map(StatisticsSummary::from_column)
        .ok_or_else(|| TableError::missing_column(column, dataset))
}

// ---------------------------------------------------------------------------
// Comparison table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    #[serde(rename = "Metric", serialize_with = "serialize_label")]
    pub metric: Metric,
    #[serde(rename = "Raw")]
    pub raw: f64,
    #[serde(rename = "Composite")]
    pub composite: f64,
    #[serde(rename = "Difference (%)")]
    pub difference_pct: f64,
}

fn serialize_label<S: serde::Serializer>(metric: &Metric, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(metric.table_label())
}

/// Raw vs composite statistics of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub column: String,
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn from_summaries(column: &str, raw: &StatisticsSummary, composite: &StatisticsSummary) -> Self {
        let rows = Metric::ALL
            .iter()
            .map(|&metric| {
                let r = raw.get(metric);
                let c = composite.get(metric);
                ComparisonRow {
                    metric,
                    raw: round_to(r, 4),
                    composite: round_to(c, 4),
                    difference_pct: percent_difference(r, c),
                }
            })
            .collect();

        ComparisonTable {
            column: column.to_string(),
            rows,
        }
    }

    /// Compare `column` between the raw and composite tables.
    pub fn build(
        raw: &TabularDataset,
        composite: &TabularDataset,
        column: &str,
    ) -> Result<Self, TableError> {
        let raw_stats = column_statistics(raw, column)?;
        let comp_stats = column_statistics(composite, column)?;
        Ok(Self::from_summaries(column, &raw_stats, &comp_stats))
    }

    /// Write the table as CSV with a `Metric` label column.
    pub fn write_csv(&self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for row in &self.rows {
            writer.serialize(row).context("writing comparison row")?;
        }
        writer.flush().context("flushing comparison CSV")?;
        Ok(())
    }
}

#[cfg(test)]
impl ComparisonTable {
    pub fn row(&self, metric: Metric) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.metric == metric)
    }
}

/// Relative change from `raw` to `composite` in percent, two decimals.
/// Zero when `raw` is zero.
pub fn percent_difference(raw: f64, composite: f64) -> f64 {
    if raw == 0.0 {
        return 0.0;
    }
    round_to((composite - raw) / raw * 100.0, 2)
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
