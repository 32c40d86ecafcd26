//! Typed contiguous buffers
//!
//! A [`Block`] is one reference-counted buffer of a single element type laid
//! out column-major, so a run of columns can be sliced out without copying.

mod dtype;
mod element;
pub mod kernels;
mod selector;

use std::ops::Range;
use std::sync::Arc;

pub use dtype::DType;
pub use element::Element;
pub use kernels::{Accumulation, BinaryOp, Reduction};
pub use selector::{IlocKey, Resolved};

use crate::error::{Error, Result};
use crate::value::Value;

/// Shared storage behind a block
#[derive(Debug, Clone)]
pub enum Buffer {
    Bool(Arc<[bool]>),
    Int32(Arc<[i32]>),
    Int64(Arc<[i64]>),
    Float64(Arc<[f64]>),
    Str(Arc<[String]>),
    Object(Arc<[Value]>),
}

macro_rules! with_data {
    ($buffer:expr, $data:ident => $body:expr) => {
        match $buffer {
            Buffer::Bool($data) => $body,
            Buffer::Int32($data) => $body,
            Buffer::Int64($data) => $body,
            Buffer::Float64($data) => $body,
            Buffer::Str($data) => $body,
            Buffer::Object($data) => $body,
        }
    };
}

macro_rules! with_dtype {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            DType::Bool => {
                type $t = bool;
                $body
            }
            DType::Int32 => {
                type $t = i32;
                $body
            }
            DType::Int64 => {
                type $t = i64;
                $body
            }
            DType::Float64 => {
                type $t = f64;
                $body
            }
            DType::Str => {
                type $t = String;
                $body
            }
            DType::Object => {
                type $t = Value;
                $body
            }
        }
    };
}

pub(crate) use with_dtype;

/// One contiguous buffer of a single element type
///
/// One-dimensional blocks hold a single column; two-dimensional blocks hold
/// `cols >= 1` columns of `rows` elements each.
#[derive(Debug, Clone)]
pub struct Block {
    buffer: Buffer,
    start: usize,
    rows: usize,
    cols: usize,
    two_d: bool,
}

fn cast_values<T: Element>(values: &[Value]) -> Result<Vec<T>> {
    values
        .iter()
        .map(|v| {
            T::from_value(v)
                .ok_or_else(|| Error::Type(format!("cannot represent {} as {}", v, T::DTYPE)))
        })
        .collect()
}

fn concat_typed<T: Element>(blocks: &[&Block]) -> Option<Vec<T>> {
    let mut out = Vec::with_capacity(blocks.iter().map(|b| b.rows * b.cols).sum());
    for block in blocks {
        let data = T::unwrap(&block.buffer)?;
        out.extend_from_slice(&data[block.start..block.start + block.rows * block.cols]);
    }
    Some(out)
}

fn infer_buffer(values: Vec<Value>) -> Buffer {
    match infer_dtype(&values) {
        DType::Object => Buffer::Object(values.into()),
        other => with_dtype!(other, T => match cast_values::<T>(&values) {
            Ok(data) => T::wrap(data.into()),
            Err(_) => Buffer::Object(values.into()),
        }),
    }
}

/// Narrowest type able to hold every value
pub fn infer_dtype(values: &[Value]) -> DType {
    let mut acc: Option<DType> = None;
    for value in values {
        let dtype = match value {
            Value::Bool(_) => DType::Bool,
            Value::Int(_) => DType::Int64,
            Value::Float(_) => DType::Float64,
            Value::Str(_) => DType::Str,
            Value::None | Value::Tuple(_) => return DType::Object,
        };
        let next = match acc {
            None => dtype,
            Some(prev) => prev.resolve(dtype),
        };
        if next == DType::Object {
            return next;
        }
        acc = Some(next);
    }
    acc.unwrap_or(DType::Float64)
}

impl Block {
    /// One-dimensional block taking ownership of `values`
    pub fn from_vec<T: Element>(values: Vec<T>) -> Block {
        let rows = values.len();
        Block {
            buffer: T::wrap(values.into()),
            start: 0,
            rows,
            cols: 1,
            two_d: false,
        }
    }

    /// One-dimensional block over an already shared buffer, without copying
    pub fn from_shared<T: Element>(data: Arc<[T]>) -> Block {
        let rows = data.len();
        Block {
            buffer: T::wrap(data),
            start: 0,
            rows,
            cols: 1,
            two_d: false,
        }
    }

    /// One-dimensional block copied from borrowed data
    pub fn from_slice<T: Element>(values: &[T]) -> Block {
        Block::from_vec(values.to_vec())
    }

    /// Two-dimensional block from column-major data
    pub fn from_column_major<T: Element>(data: Vec<T>, rows: usize, cols: usize) -> Result<Block> {
        if cols == 0 {
            return Err(Error::Shape("a block needs at least one column".into()));
        }
        if data.len() != rows * cols {
            return Err(Error::Shape(format!(
                "{} elements cannot fill {} rows by {} columns",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Block {
            buffer: T::wrap(data.into()),
            start: 0,
            rows,
            cols,
            two_d: true,
        })
    }

    /// Two-dimensional block from equal-length columns
    pub fn from_columns<T: Element>(columns: Vec<Vec<T>>) -> Result<Block> {
        let cols = columns.len();
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(Error::InconsistentRowCount {
                expected: rows,
                found: bad.len(),
            });
        }
        Block::from_column_major(columns.into_iter().flatten().collect(), rows, cols)
    }

    /// One-dimensional block with an inferred element type
    pub fn from_values(values: Vec<Value>) -> Block {
        let rows = values.len();
        Block {
            buffer: infer_buffer(values),
            start: 0,
            rows,
            cols: 1,
            two_d: false,
        }
    }

    /// One-dimensional block cast to `dtype`
    pub fn from_values_as(values: Vec<Value>, dtype: DType) -> Result<Block> {
        let rows = values.len();
        Block::from_values_shaped(values, rows, 1, false, dtype)
    }

    /// Column-major values cast to `dtype`
    pub(crate) fn from_values_shaped(
        values: Vec<Value>,
        rows: usize,
        cols: usize,
        two_d: bool,
        dtype: DType,
    ) -> Result<Block> {
        if values.len() != rows * cols {
            return Err(Error::Shape(format!(
                "{} values cannot fill {} rows by {} columns",
                values.len(),
                rows,
                cols
            )));
        }
        let buffer = match dtype {
            DType::Object => Buffer::Object(values.into()),
            other => with_dtype!(other, T => T::wrap(cast_values::<T>(&values)?.into())),
        };
        Ok(Block {
            buffer,
            start: 0,
            rows,
            cols,
            two_d,
        })
    }

    /// One-dimensional block repeating `value`, typed by the value even when empty
    pub fn full(value: &Value, rows: usize) -> Result<Block> {
        Block::from_values_as(vec![value.clone(); rows], value.dtype())
    }

    /// Two-dimensional block repeating `value`
    pub fn full_2d(value: &Value, rows: usize, cols: usize) -> Result<Block> {
        Block::from_values_shaped(
            vec![value.clone(); rows * cols],
            rows,
            cols,
            true,
            value.dtype(),
        )
    }

    pub fn dtype(&self) -> DType {
        match self.buffer {
            Buffer::Bool(_) => DType::Bool,
            Buffer::Int32(_) => DType::Int32,
            Buffer::Int64(_) => DType::Int64,
            Buffer::Float64(_) => DType::Float64,
            Buffer::Str(_) => DType::Str,
            Buffer::Object(_) => DType::Object,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ndim(&self) -> usize {
        if self.two_d {
            2
        } else {
            1
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        self.start + col * self.rows + row
    }

    /// Element at `(row, col)`, `None` when out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Value> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.value(row, col))
    }

    pub(crate) fn value(&self, row: usize, col: usize) -> Value {
        let i = self.offset(row, col);
        with_data!(&self.buffer, d => d[i].to_value())
    }

    /// Borrow one column as native elements when the type matches
    pub fn column_slice<T: Element>(&self, col: usize) -> Option<&[T]> {
        let data = T::unwrap(&self.buffer)?;
        let begin = self.offset(0, col);
        data.get(begin..begin + self.rows)
    }

    /// One column as a one-dimensional block sharing this buffer
    pub fn column(&self, col: usize) -> Block {
        Block {
            buffer: self.buffer.clone(),
            start: self.offset(0, col),
            rows: self.rows,
            cols: 1,
            two_d: false,
        }
    }

    /// A run of columns as a two-dimensional block sharing this buffer
    pub fn slice_columns(&self, range: Range<usize>) -> Block {
        Block {
            buffer: self.buffer.clone(),
            start: self.offset(0, range.start),
            rows: self.rows,
            cols: range.len(),
            two_d: true,
        }
    }

    /// Reinterpret as a two-dimensional block
    pub fn into_2d(mut self) -> Block {
        self.two_d = true;
        self
    }

    pub fn column_values(&self, col: usize) -> Vec<Value> {
        (0..self.rows).map(|r| self.value(r, col)).collect()
    }

    /// Every element, column-major
    pub fn values(&self) -> Vec<Value> {
        (0..self.cols)
            .flat_map(|c| (0..self.rows).map(move |r| (r, c)))
            .map(|(r, c)| self.value(r, c))
            .collect()
    }

    /// True when both blocks view the same allocation
    pub fn shares_buffer(&self, other: &Block) -> bool {
        let a: *const u8 = with_data!(&self.buffer, d => d.as_ptr() as *const u8);
        let b: *const u8 = with_data!(&other.buffer, d => d.as_ptr() as *const u8);
        a == b
    }

    fn rebuild<T: Element>(&self, data: Vec<T>, rows: usize) -> Block {
        Block {
            buffer: T::wrap(data.into()),
            start: 0,
            rows,
            cols: self.cols,
            two_d: self.two_d,
        }
    }

    /// Copy the given rows, in order
    pub fn take_rows(&self, rows: &[usize]) -> Block {
        with_data!(&self.buffer, d => {
            let mut out = Vec::with_capacity(rows.len() * self.cols);
            for c in 0..self.cols {
                let base = self.offset(0, c);
                out.extend(rows.iter().map(|r| d[base + r].clone()));
            }
            self.rebuild(out, rows.len())
        })
    }

    /// Copy rows by position, filling `None` positions
    ///
    /// Without an explicit fill the type-appropriate missing sentinel is used.
    pub fn take_rows_filled(&self, rows: &[Option<usize>], fill: Option<&Value>) -> Result<Block> {
        if rows.iter().all(Option::is_some) {
            let positions: Vec<usize> = rows.iter().flatten().copied().collect();
            return Ok(self.take_rows(&positions));
        }
        let (dtype, fill) = fill_target(self.dtype(), fill);
        let mut values = Vec::with_capacity(rows.len() * self.cols);
        for c in 0..self.cols {
            for row in rows {
                values.push(match row {
                    Some(r) => self.value(*r, c),
                    None => fill.clone(),
                });
            }
        }
        Block::from_values_shaped(values, rows.len(), self.cols, self.two_d, dtype)
    }

    /// Cast every element to `dtype`
    pub fn astype(&self, dtype: DType) -> Result<Block> {
        if dtype == self.dtype() {
            return Ok(self.clone());
        }
        Block::from_values_shaped(self.values(), self.rows, self.cols, self.two_d, dtype)
    }

    /// Join same-typed blocks side by side into one two-dimensional block
    pub fn hstack(blocks: &[&Block]) -> Result<Block> {
        let first = blocks
            .first()
            .ok_or_else(|| Error::Shape("no blocks to stack".into()))?;
        let dtype = first.dtype();
        let rows = first.rows;
        for block in blocks {
            if block.rows != rows {
                return Err(Error::InconsistentRowCount {
                    expected: rows,
                    found: block.rows,
                });
            }
            if block.dtype() != dtype {
                return Err(Error::Type(format!(
                    "cannot stack {} with {}",
                    block.dtype(),
                    dtype
                )));
            }
        }
        let cols = blocks.iter().map(|b| b.cols).sum();
        with_dtype!(dtype, T => {
            let data = concat_typed::<T>(blocks)
                .ok_or_else(|| Error::Type(format!("buffer is not {}", dtype)))?;
            Block::from_column_major(data, rows, cols)
        })
    }

    /// Join same-typed blocks with equal column counts top to bottom
    pub fn vstack(blocks: &[&Block]) -> Result<Block> {
        let first = blocks
            .first()
            .ok_or_else(|| Error::Shape("no blocks to stack".into()))?;
        let dtype = first.dtype();
        let cols = first.cols;
        if let Some(bad) = blocks.iter().find(|b| b.cols != cols || b.dtype() != dtype) {
            return Err(Error::Shape(format!(
                "cannot stack a {} block of {} columns onto {} columns of {}",
                bad.dtype(),
                bad.cols,
                cols,
                dtype
            )));
        }
        let rows = blocks.iter().map(|b| b.rows).sum();
        with_dtype!(dtype, T => {
            let mut data: Vec<T> = Vec::with_capacity(rows * cols);
            for c in 0..cols {
                for block in blocks {
                    let column = block
                        .column_slice::<T>(c)
                        .ok_or_else(|| Error::Type(format!("buffer is not {}", dtype)))?;
                    data.extend_from_slice(column);
                }
            }
            let mut out = Block::from_column_major(data, rows, cols)?;
            out.two_d = first.two_d;
            Ok(out)
        })
    }

    /// Apply `f` to every element, inferring the output type
    pub fn map_values<F>(&self, f: F) -> Block
    where
        F: Fn(&Value) -> Value,
    {
        let values: Vec<Value> = self.values().iter().map(f).collect();
        Block {
            buffer: infer_buffer(values),
            start: 0,
            rows: self.rows,
            cols: self.cols,
            two_d: self.two_d,
        }
    }

    pub fn has_missing(&self) -> bool {
        match &self.buffer {
            Buffer::Float64(_) => (0..self.cols)
                .filter_map(|c| self.column_slice::<f64>(c))
                .any(|col| col.iter().any(|v| v.is_nan())),
            Buffer::Object(_) => (0..self.cols)
                .filter_map(|c| self.column_slice::<Value>(c))
                .any(|col| col.iter().any(Value::is_missing)),
            _ => false,
        }
    }

    /// Boolean block marking missing elements
    pub fn isna(&self) -> Block {
        let data: Vec<bool> = self.values().iter().map(Value::is_missing).collect();
        self.rebuild(data, self.rows)
    }

    /// Replace missing elements with `fill`
    pub fn fillna(&self, fill: &Value) -> Result<Block> {
        if !self.has_missing() {
            return Ok(self.clone());
        }
        let dtype = match self.dtype() {
            DType::Object => DType::Object,
            other => other.resolve(fill.dtype()),
        };
        let values = self
            .values()
            .into_iter()
            .map(|v| if v.is_missing() { fill.clone() } else { v })
            .collect();
        Block::from_values_shaped(values, self.rows, self.cols, self.two_d, dtype)
    }
}

/// Output type and fill value when positions without a source are introduced
pub(crate) fn fill_target(dtype: DType, fill: Option<&Value>) -> (DType, Value) {
    match fill {
        None => {
            let target = dtype.with_missing();
            let sentinel = if target == DType::Float64 {
                Value::Float(f64::NAN)
            } else {
                Value::None
            };
            (target, sentinel)
        }
        Some(value) => (dtype.resolve(value.dtype()), value.clone()),
    }
}
