use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use super::Series;
use crate::block::kernels::{self, Accumulation, BinaryOp, Reduction};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::value::Value;

impl Series {
    /// Elementwise `op` after aligning both operands on the union of labels
    ///
    /// Labels present in only one operand meet the missing sentinel of the
    /// other operand's type.
    pub fn binary(&self, op: BinaryOp, other: &Series) -> Result<Series> {
        let name = if self.name == other.name {
            self.name.clone()
        } else {
            None
        };
        if self.index.equals(&other.index) {
            let values = kernels::binary(op, &self.values, &other.values)?;
            return Ok(Series::from_parts(values, self.index.clone(), name));
        }
        let index = self.index.union(&other.index)?;
        let left = self.reindex(index.clone(), None)?;
        let right = other.reindex(index.clone(), None)?;
        let values = kernels::binary(op, &left.values, &right.values)?;
        Ok(Series::from_parts(values, index, name))
    }

    /// Broadcast a scalar; with `reverse` the scalar is the left operand
    pub fn binary_scalar(&self, op: BinaryOp, value: impl Into<Value>, reverse: bool) -> Result<Series> {
        let scalar = Block::full(&value.into(), self.len())?;
        let values = if reverse {
            kernels::binary(op, &scalar, &self.values)?
        } else {
            kernels::binary(op, &self.values, &scalar)?
        };
        Ok(Series::from_parts(values, self.index.clone(), self.name.clone()))
    }

    /// Elementwise `op` against unlabelled values of exactly this length
    pub fn binary_values(&self, op: BinaryOp, values: &[Value]) -> Result<Series> {
        if values.len() != self.len() {
            return Err(Error::LengthMismatch {
                expected: self.len(),
                actual: values.len(),
            });
        }
        let other = Block::from_values(values.to_vec());
        let values = kernels::binary(op, &self.values, &other)?;
        Ok(Series::from_parts(values, self.index.clone(), self.name.clone()))
    }

    pub fn negate(&self) -> Result<Series> {
        Ok(Series::from_parts(
            kernels::negate(&self.values)?,
            self.index.clone(),
            self.name.clone(),
        ))
    }

    /// Logical not of booleans, bitwise not of integers
    pub fn invert(&self) -> Result<Series> {
        Ok(Series::from_parts(
            kernels::invert(&self.values)?,
            self.index.clone(),
            self.name.clone(),
        ))
    }

    pub fn reduce(&self, reduction: Reduction) -> Result<Value> {
        kernels::reduce(&self.values, reduction)
    }

    /// Sum skipping NaN
    pub fn sum(&self) -> Result<Value> {
        self.reduce(Reduction::Sum)
    }

    pub fn prod(&self) -> Result<Value> {
        self.reduce(Reduction::Prod)
    }

    pub fn min(&self) -> Result<Value> {
        self.reduce(Reduction::Min)
    }

    pub fn max(&self) -> Result<Value> {
        self.reduce(Reduction::Max)
    }

    pub fn all(&self) -> Result<Value> {
        self.reduce(Reduction::All)
    }

    pub fn any(&self) -> Result<Value> {
        self.reduce(Reduction::Any)
    }

    pub fn cumsum(&self) -> Result<Series> {
        self.accumulate(Accumulation::CumSum)
    }

    pub fn cumprod(&self) -> Result<Series> {
        self.accumulate(Accumulation::CumProd)
    }

    fn accumulate(&self, accumulation: Accumulation) -> Result<Series> {
        Ok(Series::from_parts(
            kernels::accumulate(&self.values, accumulation)?,
            self.index.clone(),
            self.name.clone(),
        ))
    }
}

macro_rules! series_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Series> for &Series {
            type Output = Result<Series>;

            fn $method(self, rhs: &Series) -> Result<Series> {
                self.binary($op, rhs)
            }
        }

        impl $trait<Value> for &Series {
            type Output = Result<Series>;

            fn $method(self, rhs: Value) -> Result<Series> {
                self.binary_scalar($op, rhs, false)
            }
        }
    };
}

series_binary_op!(Add, add, BinaryOp::Add);
series_binary_op!(Sub, sub, BinaryOp::Sub);
series_binary_op!(Mul, mul, BinaryOp::Mul);
series_binary_op!(Div, div, BinaryOp::Div);
series_binary_op!(BitAnd, bitand, BinaryOp::And);
series_binary_op!(BitOr, bitor, BinaryOp::Or);
series_binary_op!(BitXor, bitxor, BinaryOp::Xor);

impl Neg for &Series {
    type Output = Result<Series>;

    fn neg(self) -> Result<Series> {
        self.negate()
    }
}

impl Not for &Series {
    type Output = Result<Series>;

    fn not(self) -> Result<Series> {
        self.invert()
    }
}
