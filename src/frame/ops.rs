use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Neg, Not, Sub};

use super::Frame;
use crate::block::kernels::{Accumulation, BinaryOp, Reduction};
use crate::block::Block;
use crate::error::Result;
use crate::series::Series;
use crate::type_blocks::TypedBlockSet;
use crate::value::Value;

impl Frame {
    pub(super) fn with_blocks(&self, blocks: TypedBlockSet) -> Frame {
        Frame::from_parts(blocks, self.index.clone(), self.columns.clone(), self.name.clone())
    }

    /// Elementwise `op` after aligning both frames on the union of their row
    /// and column labels
    pub fn binary(&self, op: BinaryOp, other: &Frame) -> Result<Frame> {
        if self.index.equals(&other.index) && self.columns.equals(&other.columns) {
            return Ok(self.with_blocks(self.blocks.binary(op, &other.blocks)?));
        }
        let index = self.index.union(&other.index)?;
        let columns = self.columns.union(&other.columns)?;
        let left = self.reindex(Some(index.clone()), Some(columns.clone()), None)?;
        let right = other.reindex(Some(index.clone()), Some(columns.clone()), None)?;
        let blocks = left.blocks.binary(op, &right.blocks)?;
        Ok(Frame::from_parts(blocks, index, columns, None))
    }

    /// Elementwise `op` with a series aligned to the columns and broadcast
    /// down every row
    pub fn binary_series(&self, op: BinaryOp, series: &Series, reverse: bool) -> Result<Frame> {
        let aligned = series.reindex(self.columns.clone(), None)?;
        self.binary_row(op, &aligned.to_values(), reverse)
    }

    /// Broadcast a scalar; with `reverse` the scalar is the left operand
    pub fn binary_scalar(&self, op: BinaryOp, value: impl Into<Value>, reverse: bool) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.binary_scalar(op, &value.into(), reverse)?))
    }

    /// Broadcast one unlabelled value per column down every row
    pub fn binary_row(&self, op: BinaryOp, values: &[Value], reverse: bool) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.binary_row(op, values, reverse)?))
    }

    pub fn negate(&self) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.negate()?))
    }

    pub fn invert(&self) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.invert()?))
    }

    /// Reduce along `axis`: 0 gives one value per column, 1 one per row
    pub fn reduce(&self, axis: usize, reduction: Reduction) -> Result<Series> {
        let values = self.blocks.reduce(axis, reduction)?;
        let index = if axis == 0 {
            self.columns.clone()
        } else {
            self.index.clone()
        };
        Ok(Series::from_parts(Block::from_values(values), index, None))
    }

    pub fn sum(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::Sum)
    }

    pub fn prod(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::Prod)
    }

    pub fn min(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::Min)
    }

    pub fn max(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::Max)
    }

    pub fn all(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::All)
    }

    pub fn any(&self, axis: usize) -> Result<Series> {
        self.reduce(axis, Reduction::Any)
    }

    pub fn cumsum(&self, axis: usize) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.accumulate(axis, Accumulation::CumSum)?))
    }

    pub fn cumprod(&self, axis: usize) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.accumulate(axis, Accumulation::CumProd)?))
    }

    pub fn isna(&self) -> Frame {
        self.with_blocks(self.blocks.isna())
    }

    pub fn fillna(&self, fill: impl Into<Value>) -> Result<Frame> {
        Ok(self.with_blocks(self.blocks.fillna(&fill.into())?))
    }

    /// Apply `f` to every element; each column is re-typed by inference
    pub fn apply_elements<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        let columns = self
            .blocks
            .iter_columns()
            .map(|column| {
                let values = column
                    .column_values(0)
                    .iter()
                    .map(&f)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Block::from_values(values))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.with_blocks(TypedBlockSet::from_columns(columns, self.row_count())?))
    }

    /// One value per row from `f` applied to that row's values
    pub fn apply_rows<F>(&self, f: F) -> Result<Series>
    where
        F: Fn(&[Value]) -> Result<Value>,
    {
        let values = self
            .blocks
            .iter_rows()
            .map(|row| f(&row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::from_parts(Block::from_values(values), self.index.clone(), None))
    }

    /// One value per column from `f` applied to that column's values
    pub fn apply_columns<F>(&self, f: F) -> Result<Series>
    where
        F: Fn(&[Value]) -> Result<Value>,
    {
        let values = self
            .blocks
            .iter_columns()
            .map(|column| f(&column.column_values(0)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::from_parts(Block::from_values(values), self.columns.clone(), None))
    }

    /// Alias for [`Frame::apply_elements`]
    pub fn apply<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        self.apply_elements(f)
    }
}

macro_rules! frame_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Frame> for &Frame {
            type Output = Result<Frame>;

            fn $method(self, rhs: &Frame) -> Result<Frame> {
                self.binary($op, rhs)
            }
        }

        impl $trait<&Series> for &Frame {
            type Output = Result<Frame>;

            fn $method(self, rhs: &Series) -> Result<Frame> {
                self.binary_series($op, rhs, false)
            }
        }

        impl $trait<Value> for &Frame {
            type Output = Result<Frame>;

            fn $method(self, rhs: Value) -> Result<Frame> {
                self.binary_scalar($op, rhs, false)
            }
        }
    };
}

frame_binary_op!(Add, add, BinaryOp::Add);
frame_binary_op!(Sub, sub, BinaryOp::Sub);
frame_binary_op!(Mul, mul, BinaryOp::Mul);
frame_binary_op!(Div, div, BinaryOp::Div);
frame_binary_op!(BitAnd, bitand, BinaryOp::And);
frame_binary_op!(BitOr, bitor, BinaryOp::Or);
frame_binary_op!(BitXor, bitxor, BinaryOp::Xor);

impl Neg for &Frame {
    type Output = Result<Frame>;

    fn neg(self) -> Result<Frame> {
        self.negate()
    }
}

impl Not for &Frame {
    type Output = Result<Frame>;

    fn not(self) -> Result<Frame> {
        self.invert()
    }
}
