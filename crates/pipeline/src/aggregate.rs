//! Group-by aggregation.
//!
//! Rows are partitioned by the values of one or more key columns and each
//! `AggSpec` feeds its source column into a fresh `Aggregator` per group.
//! The output has one row per distinct key combination, sorted by key, with
//! the key columns first and one column per spec after them.
//!
//! Rows with a `Null` in any key column do not belong to any group.

use crate::sort::{SortKey, sort_by};
use data_loader::{Relation, RelationResult, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Name of the column produced by `size_by`
pub const SIZE_COLUMN: &str = "size";

/// Incremental state of one aggregate over one group.
pub trait Aggregator {
    /// Add a row's value to the aggregation state.
    fn add(&mut self, value: &Value);

    /// Produce the final aggregated value.
    fn finalize(&self) -> Value;
}

/// Counts rows, missing values included.
#[derive(Debug, Clone, Default)]
pub struct CountAggregator {
    count: i64,
}

impl Aggregator for CountAggregator {
    fn add(&mut self, _value: &Value) {
        self.count += 1;
    }

    fn finalize(&self) -> Value {
        Value::Int(self.count)
    }
}

/// Arithmetic mean of the numeric values; `Null` when there are none.
#[derive(Debug, Clone, Default)]
pub struct MeanAggregator {
    sum: f64,
    count: u64,
}

impl Aggregator for MeanAggregator {
    fn add(&mut self, value: &Value) {
        if let Some(v) = value.as_f64() {
            self.sum += v;
            self.count += 1;
        }
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            Value::Null
        } else {
            Value::Float(self.sum / self.count as f64)
        }
    }
}

/// Sum of the numeric values; stays integral until a float is seen or the
/// integer sum would overflow.
#[derive(Debug, Clone, Default)]
pub struct SumAggregator {
    int_sum: i64,
    float_sum: f64,
    is_float: bool,
}

impl Aggregator for SumAggregator {
    fn add(&mut self, value: &Value) {
        match value {
            Value::Int(v) => match self.int_sum.checked_add(*v) {
                Some(sum) => self.int_sum = sum,
                None => {
                    self.float_sum += *v as f64;
                    self.is_float = true;
                }
            },
            Value::Float(v) => {
                self.float_sum += v;
                self.is_float = true;
            }
            _ => {}
        }
    }

    fn finalize(&self) -> Value {
        if self.is_float {
            Value::Float(self.float_sum + self.int_sum as f64)
        } else {
            Value::Int(self.int_sum)
        }
    }
}

/// Supported aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunc {
    Count,
    Mean,
    Sum,
}

impl AggFunc {
    pub fn name(&self) -> &'static str {
        match self {
            AggFunc::Count => "count",
            AggFunc::Mean => "mean",
            AggFunc::Sum => "sum",
        }
    }

    pub fn aggregator(&self) -> Box<dyn Aggregator> {
        match self {
            AggFunc::Count => Box::new(CountAggregator::default()),
            AggFunc::Mean => Box::new(MeanAggregator::default()),
            AggFunc::Sum => Box::new(SumAggregator::default()),
        }
    }
}

impl fmt::Display for AggFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One output column of a group-by: a function applied to a source column.
///
/// The output column is named `{column}_{func}` unless aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggSpec {
    /// Source column; `None` counts rows without reading any column
    pub column: Option<String>,
    pub func: AggFunc,
    pub output: String,
}

impl AggSpec {
    pub fn new(column: &str, func: AggFunc) -> Self {
        Self {
            column: Some(column.to_string()),
            func,
            output: format!("{}_{}", column, func.name()),
        }
    }

    /// Row count per group, independent of any column
    pub fn rows(output: &str) -> Self {
        Self {
            column: None,
            func: AggFunc::Count,
            output: output.to_string(),
        }
    }

    /// Several functions over the same source column
    pub fn many(column: &str, funcs: &[AggFunc]) -> Vec<Self> {
        funcs.iter().map(|&func| Self::new(column, func)).collect()
    }

    pub fn alias(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }
}

/// Group `relation` by `keys` and evaluate `specs` per group
pub fn group_by(relation: &Relation, keys: &[&str], specs: &[AggSpec]) -> RelationResult<Relation> {
    let key_indices = relation.column_indices(keys)?;
    let spec_indices = specs
        .iter()
        .map(|spec| {
            spec.column
                .as_deref()
                .map(|c| relation.column_index(c))
                .transpose()
        })
        .collect::<RelationResult<Vec<Option<usize>>>>()?;

    let mut groups: BTreeMap<Vec<Value>, Vec<Box<dyn Aggregator>>> = BTreeMap::new();
    for row in relation.rows() {
        let key: Vec<Value> = key_indices.iter().map(|&k| row[k].clone()).collect();
        if key.iter().any(Value::is_null) {
            continue;
        }
        let aggs = groups
            .entry(key)
            .or_insert_with(|| specs.iter().map(|spec| spec.func.aggregator()).collect());
        for (agg, idx) in aggs.iter_mut().zip(&spec_indices) {
            match idx {
                Some(i) => agg.add(&row[*i]),
                None => agg.add(&Value::Null),
            }
        }
    }

    let columns = keys
        .iter()
        .map(|k| k.to_string())
        .chain(specs.iter().map(|spec| spec.output.clone()));
    let mut out = Relation::new(columns)?;
    for (mut key, aggs) in groups {
        key.extend(aggs.iter().map(|agg| agg.finalize()));
        out.push_row(key)?;
    }

    debug!(
        "Grouped {} rows by {:?} into {} groups",
        relation.len(),
        keys,
        out.len()
    );
    Ok(out)
}

/// Number of rows per distinct key combination, in a `size` column
pub fn size_by(relation: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    group_by(relation, keys, &[AggSpec::rows(SIZE_COLUMN)])
}

/// Occurrences of each distinct value of `column`, most frequent first.
///
/// Equal counts keep ascending value order.
pub fn value_counts(relation: &Relation, column: &str) -> RelationResult<Relation> {
    let counts = group_by(relation, &[column], &[AggSpec::rows("count")])?;
    sort_by(&counts, &[SortKey::descending("count")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RelationError;

    fn ratings() -> Relation {
        Relation::from_rows(
            ["user_id", "movie_id", "rating"],
            vec![
                vec![Value::Int(1), Value::Int(10), Value::Int(5)],
                vec![Value::Int(2), Value::Int(10), Value::Int(3)],
                vec![Value::Int(1), Value::Int(20), Value::Int(4)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_count_and_mean_per_movie() {
        let stats = group_by(
            &ratings(),
            &["movie_id"],
            &AggSpec::many("rating", &[AggFunc::Count, AggFunc::Mean]),
        )
        .unwrap();
        assert_eq!(
            stats.columns(),
            &["movie_id", "rating_count", "rating_mean"].map(String::from)
        );
        assert_eq!(
            stats.rows(),
            &[
                vec![Value::Int(10), Value::Int(2), Value::Float(4.0)],
                vec![Value::Int(20), Value::Int(1), Value::Float(4.0)],
            ]
        );
    }

    #[test]
    fn test_multi_key_groups_sorted_by_key() {
        let grouped = group_by(
            &ratings(),
            &["user_id", "movie_id"],
            &[AggSpec::new("rating", AggFunc::Sum)],
        )
        .unwrap();
        let keys: Vec<(Value, Value)> = grouped
            .rows()
            .iter()
            .map(|r| (r[0].clone(), r[1].clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Value::Int(1), Value::Int(10)),
                (Value::Int(1), Value::Int(20)),
                (Value::Int(2), Value::Int(10)),
            ]
        );
    }

    #[test]
    fn test_duplicate_ratings_are_all_counted() {
        let mut relation = ratings();
        relation
            .push_row(vec![Value::Int(1), Value::Int(10), Value::Int(1)])
            .unwrap();
        let stats = group_by(
            &relation,
            &["movie_id"],
            &AggSpec::many("rating", &[AggFunc::Count, AggFunc::Mean]),
        )
        .unwrap();
        assert_eq!(stats.rows()[0][1], Value::Int(3));
        assert_eq!(stats.rows()[0][2], Value::Float(3.0));
    }

    #[test]
    fn test_null_keys_and_values() {
        let relation = Relation::from_rows(
            ["group", "x"],
            vec![
                vec![Value::from("a"), Value::Null],
                vec![Value::from("a"), Value::Int(2)],
                vec![Value::Null, Value::Int(7)],
                vec![Value::from("b"), Value::Null],
            ],
        )
        .unwrap();
        let stats = group_by(
            &relation,
            &["group"],
            &AggSpec::many("x", &[AggFunc::Count, AggFunc::Mean, AggFunc::Sum]),
        )
        .unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(
            stats.rows()[0],
            vec![Value::from("a"), Value::Int(2), Value::Float(2.0), Value::Int(2)]
        );
        assert_eq!(
            stats.rows()[1],
            vec![Value::from("b"), Value::Int(1), Value::Null, Value::Int(0)]
        );
    }

    #[test]
    fn test_size_and_value_counts() {
        let sizes = size_by(&ratings(), &["user_id"]).unwrap();
        assert_eq!(sizes.columns()[1], SIZE_COLUMN);
        assert_eq!(sizes.rows()[0][1], Value::Int(2));

        let counts = value_counts(&ratings(), "rating").unwrap();
        // All counts tie at 1, so value order is kept
        let values: Vec<&Value> = counts.column("rating").unwrap().collect();
        assert_eq!(values, vec![&Value::Int(3), &Value::Int(4), &Value::Int(5)]);

        let counts = value_counts(&ratings(), "movie_id").unwrap();
        assert_eq!(counts.rows()[0], vec![Value::Int(10), Value::Int(2)]);
    }

    #[test]
    fn test_unknown_column_is_key_error() {
        let err = group_by(&ratings(), &["title"], &[]).unwrap_err();
        assert_eq!(err, RelationError::key("title"));
        let err = group_by(&ratings(), &["movie_id"], &[AggSpec::new("stars", AggFunc::Mean)])
            .unwrap_err();
        assert_eq!(err, RelationError::key("stars"));
    }

    #[test]
    fn test_sum_overflow_switches_to_float() {
        let mut sum = SumAggregator::default();
        sum.add(&Value::Int(i64::MAX));
        sum.add(&Value::Int(i64::MAX));
        assert_eq!(sum.finalize(), Value::Float(i64::MAX as f64 * 2.0));
    }

    #[test]
    fn test_sum_mixes_ints_and_floats() {
        let mut sum = SumAggregator::default();
        sum.add(&Value::Int(2));
        sum.add(&Value::Float(0.5));
        assert_eq!(sum.finalize(), Value::Float(2.5));
    }
}
