use super::TypedBlockSet;
use crate::block::{Block, DType};
use crate::error::{Error, Result};
use crate::value::Value;

/// Read-only view shared by the immutable and growable block sets
pub trait BlockStore {
    /// (rows, columns)
    fn shape(&self) -> (usize, usize);

    fn rows(&self) -> usize {
        self.shape().0
    }

    fn cols(&self) -> usize {
        self.shape().1
    }

    fn blocks(&self) -> &[Block];

    fn dtypes(&self) -> Vec<DType>;

    fn column(&self, col: usize) -> Result<Block>;

    fn value(&self, row: usize, col: usize) -> Result<Value>;
}

/// Block set that can gain columns
///
/// Rows are fixed at creation and existing columns are never touched; each
/// append only pushes new blocks.
#[derive(Debug, Clone)]
pub struct GrowableBlockSet {
    inner: TypedBlockSet,
}

impl GrowableBlockSet {
    /// Start with no columns and a fixed row count
    pub fn new(rows: usize) -> Self {
        GrowableBlockSet {
            inner: TypedBlockSet::empty(rows),
        }
    }

    /// Append one block of columns
    pub fn append_block(&mut self, block: Block) -> Result<()> {
        if block.rows() != self.inner.rows() {
            return Err(Error::Shape(format!(
                "cannot append a block of {} rows to {} rows",
                block.rows(),
                self.inner.rows()
            )));
        }
        let mut blocks = std::mem::take(&mut self.inner.blocks);
        blocks.push(block);
        self.inner = TypedBlockSet::assemble(blocks, self.inner.rows);
        Ok(())
    }

    /// Append a single one-dimensional column
    pub fn append_column(&mut self, column: Block) -> Result<()> {
        if column.cols() != 1 {
            return Err(Error::Shape(format!(
                "expected one column, got {}",
                column.cols()
            )));
        }
        self.append_block(column)
    }

    /// Append every column of `other`
    pub fn append_set(&mut self, other: &TypedBlockSet) -> Result<()> {
        self.inner = self.inner.extend(other)?;
        Ok(())
    }

    /// Immutable copy of the current state; blocks are shared
    pub fn snapshot(&self) -> TypedBlockSet {
        self.inner.clone()
    }

    /// Stop growing
    pub fn freeze(self) -> TypedBlockSet {
        self.inner
    }
}

impl From<TypedBlockSet> for GrowableBlockSet {
    fn from(inner: TypedBlockSet) -> Self {
        GrowableBlockSet { inner }
    }
}

impl BlockStore for GrowableBlockSet {
    fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }

    fn blocks(&self) -> &[Block] {
        self.inner.blocks()
    }

    fn dtypes(&self) -> Vec<DType> {
        self.inner.dtypes()
    }

    fn column(&self, col: usize) -> Result<Block> {
        self.inner.column(col)
    }

    fn value(&self, row: usize, col: usize) -> Result<Value> {
        self.inner.value(row, col)
    }
}
