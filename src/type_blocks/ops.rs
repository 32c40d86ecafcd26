use super::TypedBlockSet;
use crate::block::kernels::{self, Accumulation, BinaryOp, Reduction};
use crate::block::{Block, DType};
use crate::error::{Error, Result};
use crate::value::Value;

fn check_axis(axis: usize) -> Result<()> {
    if axis > 1 {
        return Err(Error::InvalidOperation(format!("axis {} does not exist", axis)));
    }
    Ok(())
}

impl TypedBlockSet {
    fn map_columns<F>(&self, f: F) -> Result<TypedBlockSet>
    where
        F: Fn(usize, &Block) -> Result<Block>,
    {
        let columns = self
            .iter_columns()
            .enumerate()
            .map(|(c, column)| f(c, &column))
            .collect::<Result<Vec<_>>>()?;
        TypedBlockSet::from_columns(columns, self.rows())
    }

    /// Elementwise `op` between two sets of identical shape
    pub fn binary(&self, op: BinaryOp, other: &TypedBlockSet) -> Result<TypedBlockSet> {
        if self.shape() != other.shape() {
            return Err(Error::Shape(format!(
                "operands of shape {:?} and {:?} do not match",
                self.shape(),
                other.shape()
            )));
        }
        self.map_columns(|c, column| kernels::binary(op, column, &other.column_block(c)))
    }

    /// Broadcast a scalar against every element
    ///
    /// With `reverse` the scalar is the left operand.
    pub fn binary_scalar(&self, op: BinaryOp, value: &Value, reverse: bool) -> Result<TypedBlockSet> {
        let scalar = Block::full(value, self.rows())?;
        self.map_columns(|_, column| {
            if reverse {
                kernels::binary(op, &scalar, column)
            } else {
                kernels::binary(op, column, &scalar)
            }
        })
    }

    /// Broadcast one value per column down every row
    ///
    /// `values` must have exactly one entry per column.
    pub fn binary_row(&self, op: BinaryOp, values: &[Value], reverse: bool) -> Result<TypedBlockSet> {
        if values.len() != self.cols() {
            return Err(Error::LengthMismatch {
                expected: self.cols(),
                actual: values.len(),
            });
        }
        self.map_columns(|c, column| {
            let scalar = Block::full(&values[c], self.rows())?;
            if reverse {
                kernels::binary(op, &scalar, column)
            } else {
                kernels::binary(op, column, &scalar)
            }
        })
    }

    pub fn negate(&self) -> Result<TypedBlockSet> {
        self.map_columns(|_, column| kernels::negate(column))
    }

    pub fn invert(&self) -> Result<TypedBlockSet> {
        self.map_columns(|_, column| kernels::invert(column))
    }

    /// Boolean set marking missing elements
    pub fn isna(&self) -> TypedBlockSet {
        let blocks = self.blocks().iter().map(Block::isna).collect();
        TypedBlockSet::assemble(blocks, self.rows())
    }

    /// Replace missing elements; blocks without missing values are shared
    pub fn fillna(&self, fill: &Value) -> Result<TypedBlockSet> {
        let blocks = self
            .blocks()
            .iter()
            .map(|b| b.fillna(fill))
            .collect::<Result<Vec<_>>>()?;
        Ok(TypedBlockSet::assemble(blocks, self.rows()))
    }

    /// Apply `f` to every element, re-inferring the type of each block
    pub fn map_values<F>(&self, f: F) -> TypedBlockSet
    where
        F: Fn(&Value) -> Value,
    {
        let blocks = self.blocks().iter().map(|b| b.map_values(&f)).collect();
        TypedBlockSet::assemble(blocks, self.rows())
    }

    /// Reduce along `axis`: 0 yields one value per column, 1 one per row
    pub fn reduce(&self, axis: usize, reduction: Reduction) -> Result<Vec<Value>> {
        check_axis(axis)?;
        if axis == 0 {
            self.iter_columns()
                .map(|column| kernels::reduce(&column, reduction))
                .collect()
        } else {
            self.iter_rows()
                .map(|row| kernels::reduce_values(&row, reduction))
                .collect()
        }
    }

    /// Running sum or product along `axis`
    pub fn accumulate(&self, axis: usize, accumulation: Accumulation) -> Result<TypedBlockSet> {
        check_axis(axis)?;
        if axis == 0 {
            return self.map_columns(|_, column| kernels::accumulate(column, accumulation));
        }
        let mut target: Option<DType> = None;
        for dtype in self.dtypes() {
            let dtype = match dtype {
                DType::Str => return Err(Error::Type("cannot accumulate str values".into())),
                DType::Bool => DType::Int64,
                other => other,
            };
            target = Some(match target {
                None => dtype,
                Some(prev) => prev.promote_numeric(dtype).unwrap_or(DType::Object),
            });
        }
        let target = match target {
            Some(DType::Int32) => DType::Int64,
            Some(dtype) => dtype,
            None => return Ok(self.clone()),
        };
        let rows = self
            .iter_rows()
            .map(|row| kernels::accumulate_values(&row, accumulation))
            .collect::<Result<Vec<_>>>()?;
        let columns = (0..self.cols())
            .map(|c| {
                let values = rows.iter().map(|row| row[c].clone()).collect();
                Block::from_values_as(values, target)
            })
            .collect::<Result<Vec<_>>>()?;
        TypedBlockSet::from_columns(columns, self.rows())
    }
}
