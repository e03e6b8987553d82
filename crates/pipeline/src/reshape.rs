//! Long-to-wide reshaping.
//!
//! `unstack` turns one key column of a grouped result into output columns,
//! `pivot_table` groups and unstacks in one step, and `stack` goes back from
//! wide to long.
//!
//! Wide column names are the display form of the key values (`"F"`, `"M"`,
//! `"20-29"`), ordered by the values' natural ordering. Keys whose display
//! forms collide (`Int(1)` and `Str("1")`, or a key named like an index
//! column) are rejected. Combinations missing from the input get the
//! caller's fill value.
//!
//! `stack` turns column names back into string keys. `stack_with_keys`
//! takes the original key values, as returned by `column_keys`, so
//! `stack_with_keys(unstack(x, Null), column_keys(x))` recovers `x` exactly
//! whatever the key type. A `Null` fill is the only one stacking can tell
//! apart from real data: `Null` cells are dropped, while any other fill
//! value comes back as ordinary cells.

use crate::aggregate::{AggFunc, AggSpec, group_by};
use data_loader::{Relation, RelationError, RelationResult, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Spread `columns` into one output column per distinct value.
///
/// `index` names the columns that identify an output row; `values` is the
/// column whose cell lands in the wide table. Each (index, columns) pair
/// may appear at most once in the input. Rows with a `Null` in the
/// `columns` column are ignored.
pub fn unstack(
    relation: &Relation,
    index: &[&str],
    columns: &str,
    values: &str,
    fill: Value,
) -> RelationResult<Relation> {
    let index_cols = relation.column_indices(index)?;
    let column_col = relation.column_index(columns)?;
    let value_col = relation.column_index(values)?;

    let mut column_keys: BTreeSet<Value> = BTreeSet::new();
    let mut cells: BTreeMap<Vec<Value>, BTreeMap<Value, Value>> = BTreeMap::new();

    for row in relation.rows() {
        let column_key = &row[column_col];
        if column_key.is_null() {
            continue;
        }
        let row_key: Vec<Value> = index_cols.iter().map(|&i| row[i].clone()).collect();
        let entry = cells.entry(row_key).or_default();
        if entry.contains_key(column_key) {
            let index_label = index_cols
                .iter()
                .map(|&i| row[i].to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RelationError::DuplicateEntry {
                index: index_label,
                column: column_key.to_string(),
            });
        }
        entry.insert(column_key.clone(), row[value_col].clone());
        column_keys.insert(column_key.clone());
    }

    let mut names: Vec<String> = index.iter().map(|name| name.to_string()).collect();
    let mut seen: HashSet<String> = names.iter().cloned().collect();
    for key in &column_keys {
        let label = key.to_string();
        if !seen.insert(label.clone()) {
            return Err(RelationError::AmbiguousColumnKey { label });
        }
        names.push(label);
    }
    let mut out = Relation::new(names)?;
    for (mut row, mut row_cells) in cells {
        for key in &column_keys {
            row.push(row_cells.remove(key).unwrap_or_else(|| fill.clone()));
        }
        out.push_row(row)?;
    }

    debug!(
        "Unstacked {} rows on {} into {} rows x {} columns",
        relation.len(),
        columns,
        out.len(),
        column_keys.len()
    );
    Ok(out)
}

/// Distinct non-null values of `columns`, in the order `unstack` lays them out
pub fn column_keys(relation: &Relation, columns: &str) -> RelationResult<Vec<Value>> {
    let idx = relation.column_index(columns)?;
    let keys: BTreeSet<&Value> = relation
        .rows()
        .iter()
        .map(|row| &row[idx])
        .filter(|v| !v.is_null())
        .collect();
    Ok(keys.into_iter().cloned().collect())
}

/// Melt every non-index column back into (index..., `column_name`, `value_name`) rows.
///
/// Column names become string values. `Null` cells are dropped.
pub fn stack(
    relation: &Relation,
    index: &[&str],
    column_name: &str,
    value_name: &str,
) -> RelationResult<Relation> {
    let index_cols = relation.column_indices(index)?;
    let keys: Vec<Value> = (0..relation.num_columns())
        .filter(|i| !index_cols.contains(i))
        .map(|i| Value::Str(relation.columns()[i].clone()))
        .collect();
    stack_with_keys(relation, index, column_name, value_name, &keys)
}

/// Like `stack`, with `keys[i]` as the key of the i-th non-index column.
///
/// `keys` must have one entry per non-index column.
pub fn stack_with_keys(
    relation: &Relation,
    index: &[&str],
    column_name: &str,
    value_name: &str,
    keys: &[Value],
) -> RelationResult<Relation> {
    let index_cols = relation.column_indices(index)?;
    let spread: Vec<usize> = (0..relation.num_columns())
        .filter(|i| !index_cols.contains(i))
        .collect();
    if keys.len() != spread.len() {
        return Err(RelationError::ArityMismatch {
            expected: spread.len(),
            found: keys.len(),
        });
    }

    let names = index
        .iter()
        .copied()
        .chain([column_name, value_name]);
    let mut out = Relation::new(names)?;
    for row in relation.rows() {
        for (&c, key) in spread.iter().zip(keys) {
            if row[c].is_null() {
                continue;
            }
            let mut long: Vec<Value> = index_cols.iter().map(|&i| row[i].clone()).collect();
            long.push(key.clone());
            long.push(row[c].clone());
            out.push_row(long)?;
        }
    }
    Ok(out)
}

/// Group by `index` + `columns`, aggregate `values` with `func`, then unstack.
///
/// Equivalent to `group_by` followed by `unstack` with the same fill policy.
pub fn pivot_table(
    relation: &Relation,
    index: &[&str],
    columns: &str,
    values: &str,
    func: AggFunc,
    fill: Value,
) -> RelationResult<Relation> {
    let mut keys = index.to_vec();
    keys.push(columns);
    let spec = AggSpec::new(values, func);
    let grouped = group_by(relation, &keys, std::slice::from_ref(&spec))?;
    unstack(&grouped, index, columns, &spec.output, fill)
}

/// Add `name = minuend - subtrahend`, computed row by row.
///
/// Missing or non-numeric operands give `Null`.
pub fn difference(
    relation: &Relation,
    name: &str,
    minuend: &str,
    subtrahend: &str,
) -> RelationResult<Relation> {
    let a = relation.column_index(minuend)?;
    let b = relation.column_index(subtrahend)?;
    Ok(relation.with_column(name, |row| row.values()[a].sub(&row.values()[b])))
}
