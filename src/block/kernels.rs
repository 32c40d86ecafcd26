//! Element kernels over single columns
//!
//! Every function here takes one-dimensional blocks; two-dimensional data is
//! fed through one column at a time by the block set.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Block, DType, Element};
use crate::error::{Error, Result};
use crate::value::Value;

/// Elementwise binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division; integer inputs produce floats
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or | BinaryOp::Xor)
    }

    /// Whether `ord` satisfies this comparison
    fn accepts(self, ord: Option<Ordering>) -> bool {
        match self {
            BinaryOp::Eq => ord == Some(Ordering::Equal),
            BinaryOp::Ne => ord != Some(Ordering::Equal),
            BinaryOp::Lt => ord == Some(Ordering::Less),
            BinaryOp::Le => matches!(ord, Some(Ordering::Less | Ordering::Equal)),
            BinaryOp::Gt => ord == Some(Ordering::Greater),
            BinaryOp::Ge => matches!(ord, Some(Ordering::Greater | Ordering::Equal)),
            _ => false,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
        };
        write!(f, "{}", symbol)
    }
}

/// Reductions collapsing an axis to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reduction {
    Sum,
    Prod,
    Min,
    Max,
    All,
    Any,
}

/// Running reductions keeping the axis length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accumulation {
    CumSum,
    CumProd,
}

fn unsupported(op: impl fmt::Display, left: DType, right: DType) -> Error {
    Error::Type(format!(
        "unsupported operand types for {}: {} and {}",
        op, left, right
    ))
}

fn to_vec<T: Element>(block: &Block) -> Result<Vec<T>> {
    if let Some(data) = block.column_slice::<T>(0) {
        return Ok(data.to_vec());
    }
    let cast = block.column(0).astype(T::DTYPE)?;
    cast.column_slice::<T>(0)
        .map(<[T]>::to_vec)
        .ok_or_else(|| Error::Type(format!("cannot view {} as {}", block.dtype(), T::DTYPE)))
}

fn zip_map<A: Copy, R, F: Fn(A, A) -> R>(a: &[A], b: &[A], f: F) -> Vec<R> {
    a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect()
}

/// Apply `op` element by element to two columns of equal length
pub fn binary(op: BinaryOp, left: &Block, right: &Block) -> Result<Block> {
    if left.rows() != right.rows() {
        return Err(Error::LengthMismatch {
            expected: left.rows(),
            actual: right.rows(),
        });
    }
    if op.is_comparison() {
        compare(op, left, right)
    } else if op.is_logical() {
        logical(op, left, right)
    } else {
        arithmetic(op, left, right)
    }
}

fn elementwise_values(op: BinaryOp, left: &Block, right: &Block) -> Result<Block> {
    let out = left
        .column_values(0)
        .iter()
        .zip(right.column_values(0).iter())
        .map(|(a, b)| binary_values(op, a, b))
        .collect::<Result<Vec<_>>>()?;
    if op.is_comparison() {
        Block::from_values_as(out, DType::Bool)
    } else {
        Block::from_values_as(out, DType::Object)
    }
}

fn arithmetic(op: BinaryOp, left: &Block, right: &Block) -> Result<Block> {
    let (lt, rt) = (left.dtype(), right.dtype());
    if lt == DType::Object || rt == DType::Object {
        return elementwise_values(op, left, right);
    }
    if lt == DType::Str || rt == DType::Str {
        if lt == rt && op == BinaryOp::Add {
            let a = to_vec::<String>(left)?;
            let b = to_vec::<String>(right)?;
            return Ok(Block::from_vec(
                a.into_iter().zip(b).map(|(x, y)| x + &y).collect::<Vec<_>>(),
            ));
        }
        return Err(unsupported(op, lt, rt));
    }
    let target = if op == BinaryOp::Div {
        DType::Float64
    } else {
        match lt.promote_numeric(rt) {
            Some(DType::Bool) => DType::Int64,
            Some(dtype) => dtype,
            None => return Err(unsupported(op, lt, rt)),
        }
    };
    match target {
        DType::Float64 => {
            let f: fn(f64, f64) -> f64 = match op {
                BinaryOp::Add => |x, y| x + y,
                BinaryOp::Sub => |x, y| x - y,
                BinaryOp::Mul => |x, y| x * y,
                BinaryOp::Div => |x, y| x / y,
                _ => return Err(unsupported(op, lt, rt)),
            };
            let (a, b) = (to_vec::<f64>(left)?, to_vec::<f64>(right)?);
            Ok(Block::from_vec(zip_map(&a, &b, f)))
        }
        DType::Int32 => {
            let f: fn(i32, i32) -> i32 = match op {
                BinaryOp::Add => i32::wrapping_add,
                BinaryOp::Sub => i32::wrapping_sub,
                BinaryOp::Mul => i32::wrapping_mul,
                _ => return Err(unsupported(op, lt, rt)),
            };
            let (a, b) = (to_vec::<i32>(left)?, to_vec::<i32>(right)?);
            Ok(Block::from_vec(zip_map(&a, &b, f)))
        }
        _ => {
            let f: fn(i64, i64) -> i64 = match op {
                BinaryOp::Add => i64::wrapping_add,
                BinaryOp::Sub => i64::wrapping_sub,
                BinaryOp::Mul => i64::wrapping_mul,
                _ => return Err(unsupported(op, lt, rt)),
            };
            let (a, b) = (to_vec::<i64>(left)?, to_vec::<i64>(right)?);
            Ok(Block::from_vec(zip_map(&a, &b, f)))
        }
    }
}

fn compare(op: BinaryOp, left: &Block, right: &Block) -> Result<Block> {
    let (lt, rt) = (left.dtype(), right.dtype());
    if lt == DType::Object || rt == DType::Object {
        return elementwise_values(op, left, right);
    }
    if lt.is_numeric() && rt.is_numeric() {
        if lt != DType::Float64 && rt != DType::Float64 {
            let (a, b) = (to_vec::<i64>(left)?, to_vec::<i64>(right)?);
            return Ok(Block::from_vec(zip_map(&a, &b, |x, y| {
                op.accepts(Some(x.cmp(&y)))
            })));
        }
        let (a, b) = (to_vec::<f64>(left)?, to_vec::<f64>(right)?);
        return Ok(Block::from_vec(zip_map(&a, &b, |x, y| {
            op.accepts(x.partial_cmp(&y))
        })));
    }
    if lt == DType::Str && rt == DType::Str {
        let (a, b) = (to_vec::<String>(left)?, to_vec::<String>(right)?);
        return Ok(Block::from_vec(
            a.iter()
                .zip(&b)
                .map(|(x, y)| op.accepts(Some(x.cmp(y))))
                .collect::<Vec<_>>(),
        ));
    }
    match op {
        BinaryOp::Eq => Ok(Block::from_vec(vec![false; left.rows()])),
        BinaryOp::Ne => Ok(Block::from_vec(vec![true; left.rows()])),
        _ => Err(unsupported(op, lt, rt)),
    }
}

fn logical(op: BinaryOp, left: &Block, right: &Block) -> Result<Block> {
    let (lt, rt) = (left.dtype(), right.dtype());
    if lt == DType::Object || rt == DType::Object {
        return elementwise_values(op, left, right);
    }
    if lt == DType::Bool && rt == DType::Bool {
        let f: fn(bool, bool) -> bool = match op {
            BinaryOp::And => |x, y| x & y,
            BinaryOp::Or => |x, y| x | y,
            _ => |x, y| x ^ y,
        };
        let (a, b) = (to_vec::<bool>(left)?, to_vec::<bool>(right)?);
        return Ok(Block::from_vec(zip_map(&a, &b, f)));
    }
    let integral = |d: DType| d == DType::Bool || d.is_integer();
    if integral(lt) && integral(rt) {
        let f: fn(i64, i64) -> i64 = match op {
            BinaryOp::And => |x, y| x & y,
            BinaryOp::Or => |x, y| x | y,
            _ => |x, y| x ^ y,
        };
        let (a, b) = (to_vec::<i64>(left)?, to_vec::<i64>(right)?);
        return Ok(Block::from_vec(zip_map(&a, &b, f)));
    }
    Err(unsupported(op, lt, rt))
}

fn compare_values(op: BinaryOp, a: &Value, b: &Value) -> Result<bool> {
    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (a, b) {
                (x, y) if x.is_numeric() && y.is_numeric() => {
                    x.compare(y) == Some(Ordering::Equal)
                }
                (x, y) => x == y,
            };
            Ok(equal == (op == BinaryOp::Eq))
        }
        _ => {
            if a.is_missing() || b.is_missing() {
                return Ok(false);
            }
            let ord = a
                .compare(b)
                .ok_or_else(|| unsupported(op, a.dtype(), b.dtype()))?;
            Ok(op.accepts(Some(ord)))
        }
    }
}

/// Apply `op` to two dynamic values
///
/// Arithmetic with a missing operand yields `Value::None`.
pub fn binary_values(op: BinaryOp, a: &Value, b: &Value) -> Result<Value> {
    if op.is_comparison() {
        return Ok(Value::Bool(compare_values(op, a, b)?));
    }
    if op.is_logical() {
        return match (a, b) {
            (Value::Int(x), Value::Int(y)) => Ok(Value::Int(match op {
                BinaryOp::And => x & y,
                BinaryOp::Or => x | y,
                _ => x ^ y,
            })),
            (x, y) => {
                let (p, q) = (x.truthy(), y.truthy());
                Ok(Value::Bool(match op {
                    BinaryOp::And => p && q,
                    BinaryOp::Or => p || q,
                    _ => p ^ q,
                }))
            }
        };
    }
    if a.is_missing() || b.is_missing() {
        return Ok(Value::None);
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) if op == BinaryOp::Add => Ok(Value::Str(format!("{}{}", x, y))),
        (x, y) if x.is_numeric() && y.is_numeric() => {
            let integral = !matches!(x, Value::Float(_)) && !matches!(y, Value::Float(_));
            if integral && op != BinaryOp::Div {
                let (p, q) = (x.as_i64().unwrap_or(0), y.as_i64().unwrap_or(0));
                Ok(Value::Int(match op {
                    BinaryOp::Add => p.wrapping_add(q),
                    BinaryOp::Sub => p.wrapping_sub(q),
                    _ => p.wrapping_mul(q),
                }))
            } else {
                let (p, q) = (x.as_f64().unwrap_or(f64::NAN), y.as_f64().unwrap_or(f64::NAN));
                Ok(Value::Float(match op {
                    BinaryOp::Add => p + q,
                    BinaryOp::Sub => p - q,
                    BinaryOp::Mul => p * q,
                    _ => p / q,
                }))
            }
        }
        (x, y) => Err(unsupported(op, x.dtype(), y.dtype())),
    }
}

/// Arithmetic negation
pub fn negate(block: &Block) -> Result<Block> {
    match block.dtype() {
        DType::Int32 => Ok(Block::from_vec(
            to_vec::<i32>(block)?.into_iter().map(i32::wrapping_neg).collect::<Vec<_>>(),
        )),
        DType::Int64 => Ok(Block::from_vec(
            to_vec::<i64>(block)?.into_iter().map(i64::wrapping_neg).collect::<Vec<_>>(),
        )),
        DType::Float64 => Ok(Block::from_vec(
            to_vec::<f64>(block)?.into_iter().map(|v| -v).collect::<Vec<_>>(),
        )),
        DType::Object => {
            let out = block
                .column_values(0)
                .into_iter()
                .map(|v| match v {
                    Value::Int(x) => Ok(Value::Int(x.wrapping_neg())),
                    Value::Float(x) => Ok(Value::Float(-x)),
                    Value::None => Ok(Value::None),
                    other => Err(Error::Type(format!("cannot negate {}", other.dtype()))),
                })
                .collect::<Result<Vec<_>>>()?;
            Block::from_values_as(out, DType::Object)
        }
        other => Err(Error::Type(format!("cannot negate {}", other))),
    }
}

/// Logical not for booleans, bitwise not for integers
pub fn invert(block: &Block) -> Result<Block> {
    match block.dtype() {
        DType::Bool => Ok(Block::from_vec(
            to_vec::<bool>(block)?.into_iter().map(|v| !v).collect::<Vec<_>>(),
        )),
        DType::Int32 => Ok(Block::from_vec(
            to_vec::<i32>(block)?.into_iter().map(|v| !v).collect::<Vec<_>>(),
        )),
        DType::Int64 => Ok(Block::from_vec(
            to_vec::<i64>(block)?.into_iter().map(|v| !v).collect::<Vec<_>>(),
        )),
        DType::Object => {
            let out = block
                .column_values(0)
                .into_iter()
                .map(|v| match v {
                    Value::Bool(x) => Ok(Value::Bool(!x)),
                    Value::Int(x) => Ok(Value::Int(!x)),
                    other => Err(Error::Type(format!("cannot invert {}", other.dtype()))),
                })
                .collect::<Result<Vec<_>>>()?;
            Block::from_values_as(out, DType::Object)
        }
        other => Err(Error::Type(format!("cannot invert {}", other))),
    }
}

/// Reduce one column to a single value
pub fn reduce(block: &Block, reduction: Reduction) -> Result<Value> {
    match block.dtype() {
        DType::Float64 => {
            let data: Vec<f64> = to_vec::<f64>(block)?
                .into_iter()
                .filter(|v| !v.is_nan())
                .collect();
            Ok(match reduction {
                Reduction::Sum => Value::Float(data.iter().sum()),
                Reduction::Prod => Value::Float(data.iter().product()),
                Reduction::Min => Value::Float(data.iter().copied().reduce(f64::min).unwrap_or(f64::NAN)),
                Reduction::Max => Value::Float(data.iter().copied().reduce(f64::max).unwrap_or(f64::NAN)),
                Reduction::All => Value::Bool(data.iter().all(|v| *v != 0.0)),
                Reduction::Any => Value::Bool(data.iter().any(|v| *v != 0.0)),
            })
        }
        DType::Int64 | DType::Int32 => {
            let data = to_vec::<i64>(block)?;
            Ok(match reduction {
                Reduction::Sum => Value::Int(data.iter().fold(0i64, |a, b| a.wrapping_add(*b))),
                Reduction::Prod => Value::Int(data.iter().fold(1i64, |a, b| a.wrapping_mul(*b))),
                Reduction::Min => data.iter().min().map_or(Value::Float(f64::NAN), |v| Value::Int(*v)),
                Reduction::Max => data.iter().max().map_or(Value::Float(f64::NAN), |v| Value::Int(*v)),
                Reduction::All => Value::Bool(data.iter().all(|v| *v != 0)),
                Reduction::Any => Value::Bool(data.iter().any(|v| *v != 0)),
            })
        }
        _ => reduce_values(&block.column_values(0), reduction),
    }
}

/// Reduce dynamic values, skipping missing ones
pub fn reduce_values(values: &[Value], reduction: Reduction) -> Result<Value> {
    let present = values.iter().filter(|v| !v.is_missing());
    match reduction {
        Reduction::Sum | Reduction::Prod => {
            let (op, init) = if reduction == Reduction::Sum {
                (BinaryOp::Add, 0)
            } else {
                (BinaryOp::Mul, 1)
            };
            present.fold(Ok(Value::Int(init)), |acc, v| {
                acc.and_then(|acc| match v {
                    Value::Str(_) | Value::Tuple(_) => Err(Error::Type(format!(
                        "cannot reduce {} values",
                        v.dtype()
                    ))),
                    _ => binary_values(op, &acc, v),
                })
            })
        }
        Reduction::Min | Reduction::Max => {
            let wanted = if reduction == Reduction::Min {
                Ordering::Less
            } else {
                Ordering::Greater
            };
            let mut best: Option<&Value> = None;
            for v in present {
                best = match best {
                    None => Some(v),
                    Some(b) => {
                        let ord = v.compare(b).ok_or_else(|| {
                            Error::Type(format!("cannot order {} and {}", v.dtype(), b.dtype()))
                        })?;
                        if ord == wanted {
                            Some(v)
                        } else {
                            Some(b)
                        }
                    }
                };
            }
            Ok(best.cloned().unwrap_or(Value::Float(f64::NAN)))
        }
        Reduction::All => Ok(Value::Bool(present.into_iter().all(Value::truthy))),
        Reduction::Any => Ok(Value::Bool(present.into_iter().any(Value::truthy))),
    }
}

/// Running sum or product of one column; missing positions stay missing
pub fn accumulate(block: &Block, accumulation: Accumulation) -> Result<Block> {
    match block.dtype() {
        DType::Bool | DType::Int32 | DType::Int64 => {
            let data = to_vec::<i64>(block)?;
            let mut acc: Option<i64> = None;
            let out: Vec<i64> = data
                .into_iter()
                .map(|v| {
                    let next = match (acc, accumulation) {
                        (None, _) => v,
                        (Some(a), Accumulation::CumSum) => a.wrapping_add(v),
                        (Some(a), Accumulation::CumProd) => a.wrapping_mul(v),
                    };
                    acc = Some(next);
                    next
                })
                .collect();
            Ok(Block::from_vec(out))
        }
        DType::Float64 => {
            let data = to_vec::<f64>(block)?;
            let mut acc: Option<f64> = None;
            let out: Vec<f64> = data
                .into_iter()
                .map(|v| {
                    if v.is_nan() {
                        return v;
                    }
                    let next = match (acc, accumulation) {
                        (None, _) => v,
                        (Some(a), Accumulation::CumSum) => a + v,
                        (Some(a), Accumulation::CumProd) => a * v,
                    };
                    acc = Some(next);
                    next
                })
                .collect();
            Ok(Block::from_vec(out))
        }
        DType::Str => Err(Error::Type("cannot accumulate str values".into())),
        DType::Object => {
            let out = accumulate_values(&block.column_values(0), accumulation)?;
            Block::from_values_as(out, DType::Object)
        }
    }
}

/// Running sum or product of dynamic values
pub fn accumulate_values(values: &[Value], accumulation: Accumulation) -> Result<Vec<Value>> {
    let op = match accumulation {
        Accumulation::CumSum => BinaryOp::Add,
        Accumulation::CumProd => BinaryOp::Mul,
    };
    let mut acc: Option<Value> = None;
    values
        .iter()
        .map(|v| {
            if v.is_missing() {
                return Ok(v.clone());
            }
            if matches!(v, Value::Str(_) | Value::Tuple(_)) {
                return Err(Error::Type(format!("cannot accumulate {} values", v.dtype())));
            }
            let next = match &acc {
                None => v.clone(),
                Some(a) => binary_values(op, a, v)?,
            };
            acc = Some(next.clone());
            Ok(next)
        })
        .collect()
}
