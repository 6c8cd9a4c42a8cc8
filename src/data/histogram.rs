use super::loader::TableError;
use super::model::TabularDataset;
use super::model::Column;
use super::stats::{column_statistics, Metric, StatisticsSummary};

/// Bin count used for every histogram in the analysis views.
pub const HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Histogram – equal-width binning
// ---------------------------------------------------------------------------

/// Equal-width bin counts over the range of the data.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Number of values per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins spanning `[min, max]`.
    ///
    /// Every bin is half-open except the last, which also holds `max`. When all
    /// values are equal the range is widened to `[v - 0.5, v + 0.5]`. An empty
    /// input yields zero counts over `[0, 1]`.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

        let (mut lo, mut hi) = finite
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if finite.is_empty() {
            (lo, hi) = (0.0, 1.0);
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let span = hi - lo;
        let width = span / bins as f64;
        let edges: Vec<f64> = (0..=bins)
            .map(|i| lo + span * i as f64 / bins as f64)
            .collect();

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    /// `(center, count)` per bin, for bar rendering.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(edge, &count)| ((edge[0] + edge[1]) / 2.0, count))
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

// ---------------------------------------------------------------------------
// HistogramFigure – everything needed to draw one distribution panel
// ---------------------------------------------------------------------------

/// A titled histogram of one column with its statistics box.
#[derive(Debug, Clone)]
pub struct HistogramFigure {
    pub title: String,
    pub column: String,
    /// CSS colour name of the bars.
    pub color: String,
    pub histogram: Histogram,
    pub stats: StatisticsSummary,
}

impl HistogramFigure {
    pub fn new(
        dataset: &TabularDataset,
        column: &str,
        title: impl Into<String>,
        color: &str,
    ) -> Result<Self, TableError> {
        let stats = column_statistics(dataset, column)?;
        let values = dataset
            .column(column)
            .map(Column::numeric_values)
            .unwrap_or_default();
        let histogram = Histogram::from_values(&values, HISTOGRAM_BINS);
        log::debug!(
            "Binned {} of {} {column} samples",
            histogram.total(),
            stats.count
        );

        Ok(HistogramFigure {
            title: title.into(),
            column: column.to_string(),
            color: color.to_string(),
            histogram,
            stats,
        })
    }

    /// Lines of the statistics box, e.g. `Mean: 1,234.5000`.
    pub fn stats_lines(&self) -> Vec<String> {
        Metric::ALL
            .iter()
            .map(|&metric| {
                let value = match metric {
                    Metric::Count => format_thousands(self.stats.count as f64, 0),
                    other => format_thousands(self.stats.get(other), 4),
                };
                format!("{}: {value}", metric.plot_label())
            })
            .collect()
    }

    pub fn stats_text(&self) -> String {
        self.stats_lines().join("\n")
    }
}

/// Format with `decimals` fraction digits and `,` grouping the integer part.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if value.is_sign_negative() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
