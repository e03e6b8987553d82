//! Binning numeric columns.
//!
//! `Bins` is a fixed partition into half-open intervals `[lo, hi)` with one
//! label per interval; `cut` maps a column through it into a label column.
//! `histogram` computes equal-width bin counts between the observed minimum
//! and maximum, the last bin closed on the right.

use data_loader::{Relation, RelationError, RelationResult, Value};
use tracing::debug;

/// Contiguous half-open intervals with a label for each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bins {
    edges: Vec<i64>,
    labels: Vec<String>,
}

impl Bins {
    /// `edges` must be strictly increasing with one more entry than `labels`
    pub fn new(edges: Vec<i64>, labels: Vec<String>) -> RelationResult<Self> {
        if edges.len() < 2 {
            return Err(RelationError::InvalidBins(
                "need at least two edges".to_string(),
            ));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RelationError::InvalidBins(format!(
                "edges must be strictly increasing: {:?}",
                edges
            )));
        }
        if labels.len() != edges.len() - 1 {
            return Err(RelationError::InvalidBins(format!(
                "{} edges need {} labels, got {}",
                edges.len(),
                edges.len() - 1,
                labels.len()
            )));
        }
        Ok(Self { edges, labels })
    }

    /// Intervals of `width` from `start` up to `end`, labelled `"lo-hi"`
    /// with an inclusive upper bound (`0..80` by 10 gives `"0-9"` .. `"70-79"`).
    pub fn uniform(start: i64, end: i64, width: i64) -> RelationResult<Self> {
        if width <= 0 || end <= start {
            return Err(RelationError::InvalidBins(format!(
                "cannot split {}..{} into steps of {}",
                start, end, width
            )));
        }
        let mut edges: Vec<i64> = (start..end).step_by(width as usize).collect();
        edges.push(end);
        let labels = edges
            .windows(2)
            .map(|w| format!("{}-{}", w[0], w[1] - 1))
            .collect();
        Self::new(edges, labels)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn edges(&self) -> &[i64] {
        &self.edges
    }

    /// Label of the interval containing `value`, if any
    pub fn assign(&self, value: f64) -> Option<&str> {
        self.edges
            .windows(2)
            .position(|w| w[0] as f64 <= value && value < w[1] as f64)
            .map(|i| self.labels[i].as_str())
    }
}

/// Copy of `relation` with `target` holding the bin label of `source`.
///
/// Values outside every interval, missing or non-numeric, get `Null`.
pub fn cut(relation: &Relation, source: &str, bins: &Bins, target: &str) -> RelationResult<Relation> {
    let mut out = relation.clone();
    cut_in_place(&mut out, source, bins, target)?;
    Ok(out)
}

/// Attach the bin label column to `relation` itself
pub fn cut_in_place(
    relation: &mut Relation,
    source: &str,
    bins: &Bins,
    target: &str,
) -> RelationResult<()> {
    let idx = relation.column_index(source)?;
    relation.add_column(target, |row| {
        row.values()[idx]
            .as_f64()
            .and_then(|v| bins.assign(v))
            .map(Value::from)
            .unwrap_or(Value::Null)
    });
    debug!("Binned {} into {} ({} bins)", source, target, bins.labels.len());
    Ok(())
}

/// One bar of a histogram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of `values` with `bins` bins.
///
/// The range is `[min, max]`; when all values are equal it is widened by
/// 0.5 on each side. No values give no bins.
pub fn histogram(values: &[f64], bins: usize) -> RelationResult<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(RelationError::InvalidBins(
            "histogram needs at least one bin".to_string(),
        ));
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }
    let width = (max - min) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let slot = (((v - min) / width) as usize).min(bins - 1);
        counts[slot] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count,
        })
        .collect())
}

/// Histogram of the numeric values of one column; missing values are skipped
pub fn histogram_column(relation: &Relation, column: &str, bins: usize) -> RelationResult<Vec<HistogramBin>> {
    let values: Vec<f64> = relation.column(column)?.filter_map(Value::as_f64).collect();
    histogram(&values, bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decade_labels() {
        let bins = Bins::uniform(0, 80, 10).unwrap();
        assert_eq!(bins.labels().len(), 8);
        assert_eq!(bins.labels()[0], "0-9");
        assert_eq!(bins.labels()[7], "70-79");
    }

    #[test]
    fn test_right_exclusive_boundaries() {
        let bins = Bins::uniform(0, 80, 10).unwrap();
        assert_eq!(bins.assign(29.0), Some("20-29"));
        assert_eq!(bins.assign(30.0), Some("30-39"));
        assert_eq!(bins.assign(0.0), Some("0-9"));
        assert_eq!(bins.assign(79.0), Some("70-79"));
        assert_eq!(bins.assign(80.0), None);
        assert_eq!(bins.assign(-1.0), None);
    }

    #[test]
    fn test_invalid_bins() {
        assert!(Bins::uniform(0, 80, 0).is_err());
        assert!(Bins::new(vec![0, 10, 10], vec!["a".into(), "b".into()]).is_err());
        assert!(Bins::new(vec![0, 10], vec![]).is_err());
    }

    #[test]
    fn test_cut_adds_label_column() {
        let users = Relation::from_rows(
            ["user_id", "age"],
            vec![
                vec![Value::Int(1), Value::Int(29)],
                vec![Value::Int(2), Value::Int(30)],
                vec![Value::Int(3), Value::Int(85)],
            ],
        )
        .unwrap();
        let bins = Bins::uniform(0, 80, 10).unwrap();
        let grouped = cut(&users, "age", &bins, "age_group").unwrap();
        let labels: Vec<&Value> = grouped.column("age_group").unwrap().collect();
        assert_eq!(
            labels,
            vec![&Value::from("20-29"), &Value::from("30-39"), &Value::Null]
        );
        assert!(!users.has_column("age_group"));
        assert!(cut(&users, "birth_year", &bins, "x").is_err());
    }

    #[test]
    fn test_histogram_counts_and_closed_last_bin() {
        let hist = histogram(&[7.0, 10.0, 20.0, 30.0, 73.0], 2).unwrap();
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].lower, 7.0);
        assert_eq!(hist[0].upper, 40.0);
        assert_eq!(hist[0].count, 4);
        assert_eq!(hist[1].count, 1);
        assert_eq!(hist[1].upper, 73.0);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 30).unwrap().is_empty());
        assert!(histogram(&[1.0], 0).is_err());
        let single = histogram(&[5.0, 5.0], 1).unwrap();
        assert_eq!(single[0].count, 2);
        assert_eq!(single[0].lower, 4.5);
    }
}
