//! The in-memory table every stage of the analysis consumes and produces.
//!
//! A `Relation` is an ordered list of rows over a fixed, ordered list of
//! column names. Rows keep insertion order unless an operation explicitly
//! sorts them. Operations return new relations; the only in-place mutators
//! are `push_row` (used while building) and `add_column` (used to attach a
//! derived column to an already joined view).

use crate::error::{RelationError, RelationResult};
use crate::value::Value;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relation {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

/// Borrowed view of one row, able to look values up by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    /// Value of `column`, or `None` when the column does not exist
    pub fn get(&self, column: &str) -> Option<&'a Value> {
        let values = self.values;
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &values[i])
    }

    pub fn values(&self) -> &'a [Value] {
        self.values
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }
}

impl Relation {
    /// Create an empty relation with the given columns.
    ///
    /// Fails with `DuplicateColumn` if a name repeats.
    pub fn new<I, S>(columns: I) -> RelationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(RelationError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Create a relation and fill it with `rows`, checking every row's width
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Value>>) -> RelationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut relation = Self::new(columns)?;
        relation.rows.reserve(rows.len());
        for row in rows {
            relation.push_row(row)?;
        }
        Ok(relation)
    }

    /// A relation with the same columns and no rows
    pub fn empty_like(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: Vec::new(),
        }
    }

    /// A relation with the same columns and the given rows
    pub fn with_rows(&self, rows: Vec<Vec<Value>>) -> RelationResult<Self> {
        let mut out = self.empty_like();
        out.rows.reserve(rows.len());
        for row in rows {
            out.push_row(row)?;
        }
        Ok(out)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Value>> {
        self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the schema, or `KeyError`
    pub fn column_index(&self, name: &str) -> RelationResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| RelationError::key(name))
    }

    pub fn column_indices(&self, names: &[&str]) -> RelationResult<Vec<usize>> {
        names.iter().map(|name| self.column_index(name)).collect()
    }

    /// Iterate over the values of one column, top to bottom
    pub fn column(&self, name: &str) -> RelationResult<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Append a row; it must carry exactly one value per column
    pub fn push_row(&mut self, row: Vec<Value>) -> RelationResult<()> {
        if row.len() != self.columns.len() {
            return Err(RelationError::ArityMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Projection onto `names`, in the order given
    pub fn select(&self, names: &[&str]) -> RelationResult<Relation> {
        let indices = self.column_indices(names)?;
        let mut out = Relation::new(names.iter().copied())?;
        out.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(out)
    }

    pub fn rename(mut self, from: &str, to: &str) -> RelationResult<Relation> {
        let idx = self.column_index(from)?;
        if from != to && self.has_column(to) {
            return Err(RelationError::DuplicateColumn {
                column: to.to_string(),
            });
        }
        self.columns[idx] = to.to_string();
        Ok(self)
    }

    /// Copy of this relation with a column computed per row.
    ///
    /// An existing column of the same name is overwritten in place, otherwise
    /// the new column is appended.
    pub fn with_column<F>(&self, name: &str, f: F) -> Relation
    where
        F: FnMut(Row<'_>) -> Value,
    {
        let mut out = self.clone();
        out.add_column(name, f);
        out
    }

    /// Attach (or overwrite) a derived column in place
    pub fn add_column<F>(&mut self, name: &str, f: F)
    where
        F: FnMut(Row<'_>) -> Value,
    {
        let computed: Vec<Value> = self.iter().map(f).collect();
        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(computed) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(computed) {
                    row.push(value);
                }
            }
        }
    }

    /// Rows for which `predicate` holds, in their original order
    pub fn filter<F>(&self, mut predicate: F) -> Relation
    where
        F: FnMut(Row<'_>) -> bool,
    {
        let mut out = self.empty_like();
        out.rows = self
            .rows
            .iter()
            .filter(|values| {
                predicate(Row {
                    columns: &self.columns,
                    values: values.as_slice(),
                })
            })
            .cloned()
            .collect();
        out
    }

    /// First `n` rows (all rows if fewer)
    pub fn head(&self, n: usize) -> Relation {
        self.slice(0..n)
    }

    /// Rows in `range`, clamped to the relation's length
    pub fn slice(&self, range: Range<usize>) -> Relation {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        let mut out = self.empty_like();
        out.rows = self.rows[start..end].to_vec();
        out
    }

    /// Drop repeated rows, keeping the first occurrence of each
    pub fn distinct(&self) -> Relation {
        let mut seen: HashSet<&[Value]> = HashSet::new();
        let mut out = self.empty_like();
        for row in &self.rows {
            if seen.insert(row.as_slice()) {
                out.rows.push(row.clone());
            }
        }
        out
    }

    /// Serializable view yielding one `{column: value}` object per row,
    /// with keys in schema order
    pub fn records(&self) -> Records<'_> {
        Records(self)
    }
}

pub struct Records<'a>(&'a Relation);

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for row in self.0.iter() {
            seq.serialize_element(&RecordRef(row))?;
        }
        seq.end()
    }
}

struct RecordRef<'a>(Row<'a>);

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len()))?;
        for (column, value) in self.0.columns.iter().zip(self.0.values) {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}
