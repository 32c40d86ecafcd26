//! Dynamic scalar values and hashable axis labels
//!
//! [`Value`] is what a single cell evaluates to once it leaves its typed
//! block; [`Label`] is the hashable subset that may appear on an axis.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::block::DType;
use crate::error::{Error, Result};

/// A single element of any block type
///
/// `None` is the generic missing value; floating point blocks use NaN instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "float_repr")] f64),
    Str(String),
    Tuple(Vec<Value>),
}

/// Non-finite floats travel as text so NaN survives a JSON round trip
mod float_repr {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            s.serialize_f64(*v)
        } else {
            s.serialize_str(&v.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Repr::deserialize(d)? {
            Repr::Number(v) => Ok(v),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

impl Value {
    /// Element type this value would occupy on its own
    pub fn dtype(&self) -> DType {
        match self {
            Value::Bool(_) => DType::Bool,
            Value::Int(_) => DType::Int64,
            Value::Float(_) => DType::Float64,
            Value::Str(_) => DType::Str,
            Value::None | Value::Tuple(_) => DType::Object,
        }
    }

    /// True for `None` and NaN
    pub fn is_missing(&self) -> bool {
        match self {
            Value::None => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Numeric view; booleans count as 0 and 1
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int(v) => v.to_f64(),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer view; floats convert only when integral
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(v) => Some(*v),
            Value::Float(v) if v.fract() == 0.0 => v.to_i64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Bool(_) | Value::Int(_) | Value::Float(_))
    }

    /// Truthiness as used by `all` / `any` and boolean masks
    pub fn truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(v) => *v != 0,
            Value::Float(v) => *v != 0.0 && !v.is_nan(),
            Value::Str(s) => !s.is_empty(),
            Value::Tuple(t) => !t.is_empty(),
        }
    }

    /// Ordering between comparable values; `None` when the kinds do not compare
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (a, b) if a.is_numeric() && b.is_numeric() => {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        ord => return Some(ord),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// Equality that treats numbers by value and two missing values as equal
    pub fn semantic_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_missing() && b.is_missing() => true,
            (a, b) if a.is_numeric() && b.is_numeric() => {
                matches!(a.compare(b), Some(Ordering::Equal))
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.semantic_eq(y))
            }
            (a, b) => a == b,
        }
    }

    /// Total ordering used for sorting mixed values
    ///
    /// Numbers come first, then text, then tuples; missing values sort last.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        fn rank(v: &Value) -> u8 {
            match v {
                v if v.is_missing() => 3,
                Value::Bool(_) | Value::Int(_) | Value::Float(_) => 0,
                Value::Str(_) => 1,
                _ => 2,
            }
        }
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Tuple(a), Value::Tuple(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (a, b) => match rank(a).cmp(&rank(b)) {
                Ordering::Equal if rank(a) == 0 => match (a.as_f64(), b.as_f64()) {
                    (Some(x), Some(y)) => x.total_cmp(&y),
                    _ => Ordering::Equal,
                },
                ord => ord,
            },
        }
    }

    /// Convert into an axis label
    pub fn to_label(&self) -> Result<Label> {
        Label::try_from(self)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
            Value::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", part)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::None,
        }
    }
}

impl From<&Label> for Value {
    fn from(label: &Label) -> Self {
        match label {
            Label::None => Value::None,
            Label::Bool(b) => Value::Bool(*b),
            Label::Int(v) => Value::Int(*v),
            Label::Float(v) => Value::Float(v.0),
            Label::Str(s) => Value::Str(s.clone()),
            Label::Tuple(parts) => Value::Tuple(parts.iter().map(Value::from).collect()),
        }
    }
}

impl From<Label> for Value {
    fn from(label: Label) -> Self {
        Value::from(&label)
    }
}

/// A hashable axis label
///
/// Hierarchical positions are addressed with `Tuple` labels, one part per depth.
/// `Int` and `Float` labels never compare equal to each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    None,
    Bool(bool),
    Int(i64),
    Float(FloatLabel),
    Str(String),
    Tuple(Vec<Label>),
}

/// Float usable as a label: equal, hashed and ordered by canonical bits
///
/// All NaNs are one label, and `-0.0` is the same label as `0.0`.
#[derive(Debug, Clone, Copy)]
pub struct FloatLabel(pub f64);

impl FloatLabel {
    fn canonical(self) -> f64 {
        f64::from_bits(canonical_bits(self.0))
    }
}

impl PartialEq for FloatLabel {
    fn eq(&self, other: &Self) -> bool {
        canonical_bits(self.0) == canonical_bits(other.0)
    }
}

impl Eq for FloatLabel {}

impl Hash for FloatLabel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.0).hash(state);
    }
}

impl PartialOrd for FloatLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical().total_cmp(&other.canonical())
    }
}

impl Serialize for FloatLabel {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        float_repr::serialize(&self.0, s)
    }
}

impl<'de> Deserialize<'de> for FloatLabel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        float_repr::deserialize(d).map(FloatLabel)
    }
}

impl Label {
    /// Per-depth parts: the tuple members, or the label itself
    pub fn parts(&self) -> &[Label] {
        match self {
            Label::Tuple(parts) => parts,
            other => std::slice::from_ref(other),
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Label::Tuple(_))
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::from(self))
    }
}

impl TryFrom<&Value> for Label {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::None => Ok(Label::None),
            Value::Bool(b) => Ok(Label::Bool(*b)),
            Value::Int(v) => Ok(Label::Int(*v)),
            Value::Str(s) => Ok(Label::Str(s.clone())),
            Value::Float(v) => Ok(Label::Float(FloatLabel(*v))),
            Value::Tuple(parts) => Ok(Label::Tuple(
                parts.iter().map(Label::try_from).collect::<Result<_>>()?,
            )),
        }
    }
}

impl TryFrom<Value> for Label {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Label::try_from(&value)
    }
}

impl From<&str> for Label {
    fn from(v: &str) -> Self {
        Label::Str(v.to_string())
    }
}

impl From<String> for Label {
    fn from(v: String) -> Self {
        Label::Str(v)
    }
}

impl From<&String> for Label {
    fn from(v: &String) -> Self {
        Label::Str(v.clone())
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<i32> for Label {
    fn from(v: i32) -> Self {
        Label::Int(i64::from(v))
    }
}

impl From<usize> for Label {
    fn from(v: usize) -> Self {
        Label::Int(v as i64)
    }
}

impl From<f64> for Label {
    fn from(v: f64) -> Self {
        Label::Float(FloatLabel(v))
    }
}

impl From<bool> for Label {
    fn from(v: bool) -> Self {
        Label::Bool(v)
    }
}

impl From<Vec<Label>> for Label {
    fn from(parts: Vec<Label>) -> Self {
        Label::Tuple(parts)
    }
}

impl<A: Into<Label>, B: Into<Label>> From<(A, B)> for Label {
    fn from((a, b): (A, B)) -> Self {
        Label::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Label>, B: Into<Label>, C: Into<Label>> From<(A, B, C)> for Label {
    fn from((a, b, c): (A, B, C)) -> Self {
        Label::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

/// Hashable wrapper used to group rows or columns by their values
///
/// Floats hash by bit pattern with all NaNs folded together.
#[derive(Debug, Clone)]
pub struct ValueKey(pub Value);

fn canonical_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn key_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => canonical_bits(*x) == canonical_bits(*y),
        (Value::Tuple(x), Value::Tuple(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| key_eq(p, q))
        }
        (x, y) => x == y,
    }
}

fn key_hash<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::None => {}
        Value::Bool(b) => b.hash(state),
        Value::Int(v) => v.hash(state),
        Value::Float(v) => canonical_bits(*v).hash(state),
        Value::Str(s) => s.hash(state),
        Value::Tuple(parts) => {
            parts.len().hash(state);
            for part in parts {
                key_hash(part, state);
            }
        }
    }
}

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        key_eq(&self.0, &other.0)
    }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        key_hash(&self.0, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parts() {
        let label = Label::from(("I", "B", 3));
        assert_eq!(label.parts().len(), 3);
        assert_eq!(Label::from("a").parts(), &[Label::from("a")]);
    }

    #[test]
    fn test_float_labels() {
        use std::collections::HashSet;
        assert_eq!(Value::Float(1.5).to_label().unwrap(), Label::from(1.5));
        assert_eq!(Value::Int(3).to_label().unwrap(), Label::Int(3));
        assert_ne!(Label::from(1.0), Label::Int(1));

        let labels: HashSet<Label> = [f64::NAN, f64::NAN, 0.0, -0.0, 2.5]
            .into_iter()
            .map(Label::from)
            .collect();
        assert_eq!(labels.len(), 3);
        assert!(Label::from(-1.0) < Label::from(0.5));
    }

    #[test]
    fn test_semantic_eq() {
        assert!(Value::Int(2).semantic_eq(&Value::Float(2.0)));
        assert!(Value::Float(f64::NAN).semantic_eq(&Value::None));
        assert!(!Value::Str("a".into()).semantic_eq(&Value::Int(1)));
    }

    #[test]
    fn test_total_cmp() {
        let mut values = vec![
            Value::None,
            Value::Str("b".into()),
            Value::Float(2.5),
            Value::Float(f64::NAN),
            Value::Int(3),
            Value::Bool(true),
            Value::Str("a".into()),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(values[0], Value::Bool(true));
        assert_eq!(values[1], Value::Float(2.5));
        assert_eq!(values[2], Value::Int(3));
        assert_eq!(values[3], Value::Str("a".into()));
        assert_eq!(values[4], Value::Str("b".into()));
        assert!(values[5].is_missing() && values[6].is_missing());
    }

    #[test]
    fn test_value_key_folds_nan() {
        use std::collections::HashSet;
        let mut keys = HashSet::new();
        keys.insert(ValueKey(Value::Float(f64::NAN)));
        keys.insert(ValueKey(Value::Float(f64::NAN)));
        keys.insert(ValueKey(Value::Float(-0.0)));
        keys.insert(ValueKey(Value::Float(0.0)));
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn test_nan_survives_json() {
        let json = serde_json::to_string(&vec![Value::Float(f64::NAN), Value::Float(1.5)]).unwrap();
        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert!(back[0].is_missing());
        assert_eq!(back[1], Value::Float(1.5));
    }
}
