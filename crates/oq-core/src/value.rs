//! Property values extracted from resource records
//!
//! Records are opaque to the engine. Accessors turn them into `PropValue`s,
//! which are totally ordered so results can be sorted and grouped no
//! matter which resource they came from.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// A single property value
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    DateTime(DateTime<Utc>),
    String(String),
    List(Vec<PropValue>),
}

impl PropValue {
    /// Convert a JSON value as returned by a listing API.
    ///
    /// Objects have no natural ordering, so they are kept as their
    /// compact JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Integer(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Self::String(s.clone()),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::Object(_) => Self::String(value.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Timestamp view; RFC 3339 strings are parsed
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::DateTime(dt) => Some(*dt),
            Self::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            _ => None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Integer(_) | Self::Float(_) => 2,
            Self::DateTime(_) => 3,
            Self::String(_) => 4,
            Self::List(_) => 5,
        }
    }
}

/// Exact comparison of an integer with a float. Going through `f64` alone
/// rounds integers past 2^53 onto their float neighbours.
fn cmp_integer_float(i: i64, f: f64) -> Ordering {
    match (i as f64).total_cmp(&f) {
        Ordering::Equal => {}
        ordering => return ordering,
    }
    // `i as f64` rounded onto `f`, so `f` is a whole number near `i`
    if f >= 9_223_372_036_854_775_808.0 {
        return Ordering::Less;
    }
    i.cmp(&(f as i64))
}

impl Ord for PropValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Integer(a), Self::Float(b)) => cmp_integer_float(*a, *b),
            (Self::Float(a), Self::Integer(b)) => cmp_integer_float(*b, *a).reverse(),
            (Self::Float(a), Self::Float(b)) => a.total_cmp(b),
            (Self::DateTime(a), Self::DateTime(b)) => a.cmp(b),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for PropValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PropValue {}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "None"),
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::DateTime(dt) => write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
            Self::String(s) => write!(f, "{}", s),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for PropValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for PropValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<DateTime<Utc>> for PropValue {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::DateTime(dt)
    }
}

impl<T: Into<PropValue>> From<Vec<T>> for PropValue {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        assert_eq!(PropValue::from_json(&json!(null)), PropValue::Null);
        assert_eq!(PropValue::from_json(&json!(3)), PropValue::Integer(3));
        assert_eq!(PropValue::from_json(&json!(2.5)), PropValue::Float(2.5));
        assert_eq!(PropValue::from_json(&json!("abc")), PropValue::from("abc"));
        assert_eq!(
            PropValue::from_json(&json!(["a", 1])),
            PropValue::List(vec![PropValue::from("a"), PropValue::Integer(1)])
        );
    }

    #[test]
    fn test_numeric_ordering_across_variants() {
        assert_eq!(PropValue::Integer(2), PropValue::Float(2.0));
        assert!(PropValue::Integer(1) < PropValue::Float(1.5));
        assert!(PropValue::Float(-0.5) < PropValue::Integer(0));
    }

    #[test]
    fn test_large_integers_compare_exactly_with_floats() {
        let two_53 = 1_i64 << 53;
        let float = PropValue::Float(two_53 as f64);
        let above = PropValue::Integer(two_53 + 1);

        assert_eq!(PropValue::Integer(two_53), float);
        assert_ne!(above, float);
        assert!(above > float);
        assert!(float < above);

        // ordering stays transitive across the three values
        let mut values = vec![above.clone(), float.clone(), PropValue::Integer(two_53)];
        values.sort();
        assert_eq!(values[2], above);

        assert!(PropValue::Integer(i64::MAX) < PropValue::Float(9_223_372_036_854_775_808.0));
        assert_eq!(PropValue::Integer(i64::MIN), PropValue::Float(i64::MIN as f64));
    }

    #[test]
    fn test_mixed_variants_order_by_rank() {
        let mut values = vec![
            PropValue::from("b"),
            PropValue::Integer(7),
            PropValue::Null,
            PropValue::Bool(true),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                PropValue::Null,
                PropValue::Bool(true),
                PropValue::Integer(7),
                PropValue::from("b"),
            ]
        );
    }

    #[test]
    fn test_as_datetime_parses_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            PropValue::from("2024-03-01T12:00:00Z").as_datetime(),
            Some(expected)
        );
        assert_eq!(PropValue::from("yesterday").as_datetime(), None);
        assert_eq!(PropValue::Integer(5).as_datetime(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(PropValue::Null.to_string(), "None");
        assert_eq!(PropValue::from(vec![1, 2]).to_string(), "[1, 2]");
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(PropValue::from(dt).to_string(), "2024-03-01T12:00:00Z");
    }
}
