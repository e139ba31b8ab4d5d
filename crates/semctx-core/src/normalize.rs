//! Conversion of rich in-memory field values into JSON-safe primitives.
//!
//! Model instances hold values a JSON serializer cannot take directly:
//! enumerated choices, timestamps, dense numeric arrays. [`normalize`] maps
//! each of them to plain JSON and leaves everything else alone, recursing
//! through maps and sequences.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayViewD};
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

/// `YYYY-MM-DDTHH:MM:SS`, with fractional seconds only when non-zero.
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// An enumeration with a fixed set of variants, each carrying a scalar.
pub trait ClosedChoice {
    fn variant(&self) -> &str;
    fn scalar(&self) -> Value;
}

/// A value the normalizer does not know how to convert. It is passed
/// through untouched and serializes itself.
pub trait OpaqueValue: fmt::Debug + Send + Sync {
    fn to_json(&self) -> Value;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub variant: String,
    pub scalar: Value,
}

impl Choice {
    pub fn of(choice: &impl ClosedChoice) -> Self {
        Self {
            variant: choice.variant().to_string(),
            scalar: choice.scalar(),
        }
    }
}

/// A dense numeric array of any rank.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Float(ArrayD<f64>),
    Int(ArrayD<i64>),
}

impl NumericArray {
    pub fn ndim(&self) -> usize {
        match self {
            NumericArray::Float(array) => array.ndim(),
            NumericArray::Int(array) => array.ndim(),
        }
    }

    /// Nested JSON arrays in row-major order. A rank-0 array becomes a bare
    /// number; NaN and infinities become `null`.
    pub fn to_json(&self) -> Value {
        match self {
            NumericArray::Float(array) => nest(array.view(), &|x: f64| {
                Number::from_f64(x).map_or(Value::Null, Value::Number)
            }),
            NumericArray::Int(array) => nest(array.view(), &|x: i64| Value::from(x)),
        }
    }
}

fn nest<T: Copy>(view: ArrayViewD<'_, T>, leaf: &impl Fn(T) -> Value) -> Value {
    if view.ndim() == 0 {
        return view.iter().next().map_or(Value::Null, |x| leaf(*x));
    }
    Value::Array(view.outer_iter().map(|sub| nest(sub, leaf)).collect())
}

#[derive(Debug, Clone)]
pub enum FieldValue {
    Map(IndexMap<String, FieldValue>),
    Seq(Vec<FieldValue>),
    Choice(Choice),
    Timestamp(DateTime<FixedOffset>),
    LocalTimestamp(NaiveDateTime),
    Array(NumericArray),
    Json(Value),
    Opaque(Arc<dyn OpaqueValue>),
}

impl FieldValue {
    pub fn choice(choice: &impl ClosedChoice) -> Self {
        FieldValue::Choice(Choice::of(choice))
    }

    pub fn opaque(value: impl OpaqueValue + 'static) -> Self {
        FieldValue::Opaque(Arc::new(value))
    }

    /// Whether this value is already JSON-safe all the way down.
    pub fn is_normalized(&self) -> bool {
        match self {
            FieldValue::Map(map) => map.values().all(FieldValue::is_normalized),
            FieldValue::Seq(items) => items.iter().all(FieldValue::is_normalized),
            FieldValue::Json(_) | FieldValue::Opaque(_) => true,
            FieldValue::Choice(_)
            | FieldValue::Timestamp(_)
            | FieldValue::LocalTimestamp(_)
            | FieldValue::Array(_) => false,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<ArrayD<f64>> for FieldValue {
    fn from(array: ArrayD<f64>) -> Self {
        FieldValue::Array(NumericArray::Float(array))
    }
}

impl From<ArrayD<i64>> for FieldValue {
    fn from(array: ArrayD<i64>) -> Self {
        FieldValue::Array(NumericArray::Int(array))
    }
}

impl From<DateTime<FixedOffset>> for FieldValue {
    fn from(timestamp: DateTime<FixedOffset>) -> Self {
        FieldValue::Timestamp(timestamp)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(timestamp: NaiveDateTime) -> Self {
        FieldValue::LocalTimestamp(timestamp)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self.clone()).serialize(serializer)
    }
}

/// Replace every choice, timestamp and numeric array in `value` by its JSON
/// form. Maps keep their order; opaque values are left as they are.
pub fn normalize(value: FieldValue) -> FieldValue {
    match value {
        FieldValue::Map(map) => {
            FieldValue::Map(map.into_iter().map(|(k, v)| (k, normalize(v))).collect())
        }
        FieldValue::Seq(items) => FieldValue::Seq(items.into_iter().map(normalize).collect()),
        FieldValue::Opaque(opaque) => FieldValue::Opaque(opaque),
        leaf => FieldValue::Json(to_json(leaf)),
    }
}

pub fn to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Map(map) => Value::Object(map.into_iter().map(|(k, v)| (k, to_json(v))).collect()),
        FieldValue::Seq(items) => Value::Array(items.into_iter().map(to_json).collect()),
        FieldValue::Choice(choice) => choice.scalar,
        FieldValue::Timestamp(timestamp) => Value::String(timestamp.to_rfc3339()),
        FieldValue::LocalTimestamp(timestamp) => {
            Value::String(timestamp.format(LOCAL_TIMESTAMP_FORMAT).to_string())
        }
        FieldValue::Array(array) => array.to_json(),
        FieldValue::Json(value) => value,
        FieldValue::Opaque(opaque) => opaque.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use ndarray::{arr0, arr2, Array1};
    use serde_json::json;

    enum Status {
        Red,
        Green,
    }

    impl ClosedChoice for Status {
        fn variant(&self) -> &str {
            match self {
                Status::Red => "Red",
                Status::Green => "Green",
            }
        }

        fn scalar(&self) -> Value {
            match self {
                Status::Red => json!("red"),
                Status::Green => json!("green"),
            }
        }
    }

    #[test]
    fn choice_becomes_its_scalar() {
        assert_eq!(to_json(FieldValue::choice(&Status::Green)), json!("green"));
        assert_eq!(Choice::of(&Status::Red).variant, "Red");
    }

    #[test]
    fn int_matrix_row_major() {
        let value = FieldValue::from(arr2(&[[1i64, 2], [3, 4]]).into_dyn());
        assert_eq!(to_json(value), json!([[1, 2], [3, 4]]));
    }

    #[test]
    fn rank_zero_is_a_number() {
        let value = FieldValue::from(arr0(2.5f64).into_dyn());
        assert_eq!(to_json(value), json!(2.5));
    }

    #[test]
    fn non_finite_floats_are_null() {
        let value = FieldValue::from(Array1::from(vec![1.0, f64::NAN, f64::INFINITY]).into_dyn());
        assert_eq!(to_json(value), json!([1.0, null, null]));
    }

    #[test]
    fn timestamps_are_iso_8601() {
        let zoned = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
            .unwrap();
        assert_eq!(to_json(zoned.into()), json!("2024-05-01T12:30:00+01:00"));

        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap();
        assert_eq!(to_json(naive.into()), json!("2024-05-01T12:30:00"));

        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_micro_opt(12, 30, 0, 250)
            .unwrap();
        assert_eq!(to_json(naive.into()), json!("2024-05-01T12:30:00.000250"));
    }

    #[derive(Debug)]
    struct Point(i32, i32);

    impl OpaqueValue for Point {
        fn to_json(&self) -> Value {
            json!({"x": self.0, "y": self.1})
        }
    }

    #[test]
    fn opaque_passes_through_normalize() {
        let normalized = normalize(FieldValue::opaque(Point(1, 2)));
        assert!(matches!(normalized, FieldValue::Opaque(_)));
        assert_eq!(to_json(normalized), json!({"x": 1, "y": 2}));
    }

    #[test]
    fn normalize_recurses_and_keeps_order() {
        let value = FieldValue::Map(IndexMap::from([
            ("z".to_string(), FieldValue::choice(&Status::Red)),
            ("a".to_string(), FieldValue::Seq(vec![FieldValue::from(json!(1)), FieldValue::choice(&Status::Green)])),
        ]));
        assert!(!value.is_normalized());
        let normalized = normalize(value);
        assert!(normalized.is_normalized());

        let keys: Vec<String> = match &normalized {
            FieldValue::Map(map) => map.keys().cloned().collect(),
            other => panic!("expected a map, got {other:?}"),
        };
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(
            serde_json::to_string(&normalized).unwrap(),
            r#"{"z":"red","a":[1,"green"]}"#
        );
    }
}
