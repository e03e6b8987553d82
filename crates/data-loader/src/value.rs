//! Scalar cell values stored in a `Relation`.
//!
//! A `Value` is one of: missing (`Null`), a 64-bit integer, a float, or a
//! string (category labels such as `"M"` or `"20-29"` are plain strings).
//!
//! Values are used as grouping keys, join keys and sort keys, so they need
//! `Eq`, `Hash` and a total `Ord`. Floats are compared by bit pattern for
//! equality and with `f64::total_cmp` for ordering, which keeps the three
//! traits consistent with each other.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// One cell of a relation.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Elementwise subtraction used by derived columns.
    ///
    /// Two integers stay integral unless the result overflows `i64`; any
    /// other numeric pair is computed in `f64`. A missing or non-numeric
    /// operand yields `Null`.
    pub fn sub(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => match a.checked_sub(*b) {
                Some(v) => Value::Int(v),
                None => Value::Float(*a as f64 - *b as f64),
            },
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Value::Float(a - b),
                _ => Value::Null,
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Int(_) => 1,
            Value::Float(_) => 2,
            Value::Str(_) => 3,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Null => {}
            Value::Int(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            // Mixed numerics compare by magnitude; equal magnitudes fall
            // back to the variant so Ord agrees with Eq.
            (Value::Int(a), Value::Float(b)) => (*a as f64)
                .total_cmp(b)
                .then(Ordering::Less),
            (Value::Float(a), Value::Int(b)) => a
                .total_cmp(&(*b as f64))
                .then(Ordering::Greater),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_float_keys_hash_and_compare() {
        let mut set = HashSet::new();
        set.insert(Value::Float(4.0));
        assert!(set.contains(&Value::Float(4.0)));
        assert!(!set.contains(&Value::Int(4)));
        assert_eq!(Value::Float(1.5).cmp(&Value::Float(2.5)), Ordering::Less);
    }

    #[test]
    fn test_mixed_numeric_ordering() {
        assert!(Value::Int(2) < Value::Float(2.5));
        assert!(Value::Float(1.5) < Value::Int(2));
        assert!(Value::Int(2) < Value::Float(2.0));
        assert!(Value::Null < Value::Int(-100));
        assert!(Value::Float(1e9) < Value::Str("a".into()));
    }

    #[test]
    fn test_sub_overflow_falls_back_to_float() {
        let diff = Value::Int(i64::MIN).sub(&Value::Int(1));
        assert_eq!(diff, Value::Float(i64::MIN as f64 - 1.0));
        assert_eq!(Value::Int(i64::MAX).sub(&Value::Int(-1)).as_f64(), Some(i64::MAX as f64 + 1.0));
    }

    #[test]
    fn test_sub() {
        assert_eq!(Value::Int(5).sub(&Value::Int(2)), Value::Int(3));
        assert_eq!(Value::Int(0).sub(&Value::Float(3.5)), Value::Float(-3.5));
        assert_eq!(Value::Null.sub(&Value::Int(1)), Value::Null);
        assert_eq!(Value::from("x").sub(&Value::Int(1)), Value::Null);
    }

    #[test]
    fn test_display_and_json() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("20-29").to_string(), "20-29");
        let json = serde_json::to_string(&vec![Value::Null, Value::Int(3), Value::from("F")]).unwrap();
        assert_eq!(json, r#"[null,3,"F"]"#);
    }
}
