use std::sync::Arc;

use num_traits::ToPrimitive;

use super::{Buffer, DType};
use crate::value::Value;

/// Native element types a block can be built from
pub trait Element: Clone + Send + Sync + 'static {
    const DTYPE: DType;

    /// Lift a native element into a dynamic value
    fn to_value(&self) -> Value;

    /// Cast a dynamic value into this element type, `None` if impossible
    fn from_value(value: &Value) -> Option<Self>;

    fn wrap(data: Arc<[Self]>) -> Buffer;

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>>;
}

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(v) => Some(*v != 0),
            Value::Float(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Bool(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Bool(d) => Some(d),
            _ => None,
        }
    }
}

impl Element for i32 {
    const DTYPE: DType = DType::Int32;

    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(i32::from(*b)),
            Value::Int(v) => i32::try_from(*v).ok(),
            Value::Float(v) => v.to_i32(),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Int32(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Int32(d) => Some(d),
            _ => None,
        }
    }
}

impl Element for i64 {
    const DTYPE: DType = DType::Int64;

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(v) => Some(*v),
            Value::Float(v) => v.to_i64(),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Int64(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Int64(d) => Some(d),
            _ => None,
        }
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::Float64;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::None => Some(f64::NAN),
            Value::Str(s) => s.trim().parse().ok(),
            other => other.as_f64(),
        }
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Float64(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Float64(d) => Some(d),
            _ => None,
        }
    }
}

impl Element for String {
    const DTYPE: DType = DType::Str;

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Str(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Str(d) => Some(d),
            _ => None,
        }
    }
}

impl Element for Value {
    const DTYPE: DType = DType::Object;

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn wrap(data: Arc<[Self]>) -> Buffer {
        Buffer::Object(data)
    }

    fn unwrap(buffer: &Buffer) -> Option<&Arc<[Self]>> {
        match buffer {
            Buffer::Object(d) => Some(d),
            _ => None,
        }
    }
}
