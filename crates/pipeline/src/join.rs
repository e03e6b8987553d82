//! Equality-key inner joins.
//!
//! The right side is indexed in a hash table and the left side probes it,
//! so the output follows left row order, and within one left row the order
//! of its right matches. Rows whose key contains a `Null` never match.
//!
//! Output schema: every left column, then every right column except the
//! join keys. A non-key right column whose name already exists on the left
//! is renamed with a `_right` suffix.

use data_loader::{Relation, RelationError, RelationResult, Value};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Inner join of `left` and `right` on the columns named in `on`
pub fn inner_join(left: &Relation, right: &Relation, on: &[&str]) -> RelationResult<Relation> {
    if on.is_empty() {
        return Err(RelationError::NoJoinKeys);
    }
    let left_keys = left.column_indices(on)?;
    let right_keys = right.column_indices(on)?;

    let right_keep: Vec<usize> = (0..right.num_columns())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let mut columns: Vec<String> = left.columns().to_vec();
    for &i in &right_keep {
        let name = &right.columns()[i];
        if left.has_column(name) {
            columns.push(format!("{}_right", name));
        } else {
            columns.push(name.clone());
        }
    }

    let mut index: HashMap<Vec<&Value>, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows().iter().enumerate() {
        let key: Vec<&Value> = right_keys.iter().map(|&k| &row[k]).collect();
        if key.iter().any(|v| v.is_null()) {
            continue;
        }
        index.entry(key).or_default().push(i);
    }

    let mut out = Relation::new(columns)?;
    for row in left.rows() {
        let key: Vec<&Value> = left_keys.iter().map(|&k| &row[k]).collect();
        let Some(matches) = index.get(&key) else {
            continue;
        };
        for &r in matches {
            let right_row = &right.rows()[r];
            let mut joined = row.clone();
            joined.extend(right_keep.iter().map(|&i| right_row[i].clone()));
            out.push_row(joined)?;
        }
    }

    debug!(
        "Joined {} x {} rows on {:?} -> {} rows",
        left.len(),
        right.len(),
        on,
        out.len()
    );
    if out.is_empty() {
        warn!("Join on {:?} produced no rows", on);
    }
    Ok(out)
}

/// Inner join on every column name the two relations share
pub fn natural_join(left: &Relation, right: &Relation) -> RelationResult<Relation> {
    let shared: Vec<&str> = left
        .columns()
        .iter()
        .filter(|c| right.has_column(c))
        .map(String::as_str)
        .collect();
    if shared.is_empty() {
        return Err(RelationError::NoJoinKeys);
    }
    inner_join(left, right, &shared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies() -> Relation {
        Relation::from_rows(
            ["movie_id", "title"],
            vec![
                vec![Value::Int(10), Value::from("Heat (1995)")],
                vec![Value::Int(20), Value::from("Fargo (1996)")],
                vec![Value::Int(30), Value::from("Unrated (1990)")],
            ],
        )
        .unwrap()
    }

    fn ratings() -> Relation {
        Relation::from_rows(
            ["user_id", "movie_id", "rating"],
            vec![
                vec![Value::Int(1), Value::Int(20), Value::Int(4)],
                vec![Value::Int(1), Value::Int(10), Value::Int(5)],
                vec![Value::Int(2), Value::Int(10), Value::Int(3)],
                vec![Value::Int(2), Value::Int(99), Value::Int(1)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_inner_join_drops_unmatched_both_sides() {
        let joined = inner_join(&movies(), &ratings(), &["movie_id"]).unwrap();
        assert_eq!(
            joined.columns(),
            &["movie_id", "title", "user_id", "rating"].map(String::from)
        );
        // Movie 30 has no ratings, rating for 99 has no movie
        assert_eq!(joined.len(), 3);
        // Left order first, then right order within a key
        assert_eq!(joined.rows()[0][0], Value::Int(10));
        assert_eq!(joined.rows()[0][2], Value::Int(1));
        assert_eq!(joined.rows()[1][2], Value::Int(2));
        assert_eq!(joined.rows()[2][1], Value::from("Fargo (1996)"));
    }

    #[test]
    fn test_natural_join_uses_shared_columns() {
        let joined = natural_join(&movies(), &ratings()).unwrap();
        assert_eq!(joined.len(), 3);
        assert_eq!(joined.num_columns(), 4);
    }

    #[test]
    fn test_zero_matches_is_empty_not_error() {
        let other = Relation::from_rows(
            ["movie_id", "tag"],
            vec![vec![Value::Int(7), Value::from("x")]],
        )
        .unwrap();
        let joined = inner_join(&movies(), &other, &["movie_id"]).unwrap();
        assert!(joined.is_empty());
        assert_eq!(joined.num_columns(), 3);
    }

    #[test]
    fn test_missing_key_and_no_shared_columns() {
        assert_eq!(
            inner_join(&movies(), &ratings(), &["user_id"]).unwrap_err(),
            RelationError::key("user_id")
        );
        let unrelated = Relation::new(["zip_code"]).unwrap();
        assert_eq!(
            natural_join(&movies(), &unrelated).unwrap_err(),
            RelationError::NoJoinKeys
        );
    }

    #[test]
    fn test_null_keys_never_match() {
        let left = Relation::from_rows(["k", "a"], vec![vec![Value::Null, Value::Int(1)]]).unwrap();
        let right = Relation::from_rows(["k", "b"], vec![vec![Value::Null, Value::Int(2)]]).unwrap();
        assert!(inner_join(&left, &right, &["k"]).unwrap().is_empty());
    }

    #[test]
    fn test_clashing_column_gets_suffix() {
        let left = Relation::from_rows(["k", "v"], vec![vec![Value::Int(1), Value::Int(1)]]).unwrap();
        let right = Relation::from_rows(["k", "v"], vec![vec![Value::Int(1), Value::Int(2)]]).unwrap();
        let joined = inner_join(&left, &right, &["k"]).unwrap();
        assert_eq!(joined.columns(), &["k", "v", "v_right"].map(String::from));
        assert_eq!(joined.rows()[0], vec![Value::Int(1), Value::Int(1), Value::Int(2)]);
    }
}
