//! Heterogeneous column storage
//!
//! [`TypedBlockSet`] presents an ordered list of typed [`Block`]s as one
//! logical row-by-column matrix. Selections slice whole runs of columns out of
//! the existing blocks wherever possible, so derived sets keep sharing buffers
//! with their source.

mod growable;
mod ops;
mod reshape;

pub use growable::{BlockStore, GrowableBlockSet};
pub use reshape::AssignGrid;

use crate::block::{Block, DType, IlocKey, Resolved};
use crate::error::{Error, Result};
use crate::value::Value;

/// Outcome of [`TypedBlockSet::extract`]
#[derive(Debug, Clone)]
pub enum Extracted {
    /// Both axes kept
    Blocks(TypedBlockSet),
    /// One axis collapsed to a single position
    Array(Block),
    /// Both axes collapsed
    Element(Value),
}

/// Ordered blocks of equal row count forming one logical matrix
#[derive(Debug, Clone)]
pub struct TypedBlockSet {
    blocks: Vec<Block>,
    /// Logical column -> (block, column offset within block)
    column_map: Vec<(usize, usize)>,
    rows: usize,
}

impl TypedBlockSet {
    /// Validate row counts and take ownership of the given blocks
    ///
    /// Blocks are referenced as given; nothing is copied.
    pub fn from_blocks<I>(blocks: I) -> Result<Self>
    where
        I: IntoIterator<Item = Block>,
    {
        let blocks: Vec<Block> = blocks.into_iter().collect();
        let rows = blocks.first().map(Block::rows).unwrap_or(0);
        if let Some(bad) = blocks.iter().find(|b| b.rows() != rows) {
            return Err(Error::InconsistentRowCount {
                expected: rows,
                found: bad.rows(),
            });
        }
        Ok(Self::assemble(blocks, rows))
    }

    /// A set with `rows` rows and no columns
    pub fn empty(rows: usize) -> Self {
        Self::assemble(Vec::new(), rows)
    }

    /// A single block repeating `value`
    pub fn from_element(value: &Value, rows: usize, cols: usize) -> Result<Self> {
        if cols == 0 {
            return Ok(Self::empty(rows));
        }
        Ok(Self::assemble(vec![Block::full_2d(value, rows, cols)?], rows))
    }

    /// Build from one-dimensional columns, merging adjacent columns of equal type
    pub fn from_columns(columns: Vec<Block>, rows: usize) -> Result<Self> {
        if let Some(bad) = columns.iter().find(|c| c.rows() != rows) {
            return Err(Error::InconsistentRowCount {
                expected: rows,
                found: bad.rows(),
            });
        }
        let mut blocks = Vec::new();
        let mut run: Vec<&Block> = Vec::new();
        for column in &columns {
            if run.last().is_some_and(|prev| prev.dtype() != column.dtype()) {
                blocks.push(merge_run(&run)?);
                run.clear();
            }
            run.push(column);
        }
        if !run.is_empty() {
            blocks.push(merge_run(&run)?);
        }
        Ok(Self::assemble(blocks, rows))
    }

    pub(crate) fn assemble(blocks: Vec<Block>, rows: usize) -> Self {
        let column_map = blocks
            .iter()
            .enumerate()
            .flat_map(|(b, block)| (0..block.cols()).map(move |offset| (b, offset)))
            .collect();
        TypedBlockSet {
            blocks,
            column_map,
            rows,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.column_map.len())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.column_map.len()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Element type of every logical column
    pub fn dtypes(&self) -> Vec<DType> {
        self.column_map
            .iter()
            .map(|(b, _)| self.blocks[*b].dtype())
            .collect()
    }

    pub fn dtype(&self, col: usize) -> Result<DType> {
        self.check_col(col)?;
        let (b, _) = self.column_map[col];
        Ok(self.blocks[b].dtype())
    }

    fn check_col(&self, col: usize) -> Result<()> {
        if col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                index: col,
                size: self.cols(),
            });
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: self.rows,
            });
        }
        Ok(())
    }

    /// Column without bounds checking
    pub(crate) fn column_block(&self, col: usize) -> Block {
        let (b, offset) = self.column_map[col];
        self.blocks[b].column(offset)
    }

    /// One logical column as a one-dimensional block sharing storage
    pub fn column(&self, col: usize) -> Result<Block> {
        self.check_col(col)?;
        Ok(self.column_block(col))
    }

    pub fn value(&self, row: usize, col: usize) -> Result<Value> {
        self.check_row(row)?;
        self.check_col(col)?;
        let (b, offset) = self.column_map[col];
        Ok(self.blocks[b].value(row, offset))
    }

    /// Values of one row across all columns
    pub fn row(&self, row: usize) -> Result<Vec<Value>> {
        self.check_row(row)?;
        Ok(self
            .column_map
            .iter()
            .map(|(b, offset)| self.blocks[*b].value(row, *offset))
            .collect())
    }

    /// One row over the given columns, typed by resolving their element types
    pub fn row_array(&self, row: usize, cols: &[usize]) -> Result<Block> {
        self.check_row(row)?;
        let mut values = Vec::with_capacity(cols.len());
        let mut dtypes = Vec::with_capacity(cols.len());
        for &col in cols {
            self.check_col(col)?;
            let (b, offset) = self.column_map[col];
            values.push(self.blocks[b].value(row, offset));
            dtypes.push(self.blocks[b].dtype());
        }
        let dtype = DType::resolve_all(dtypes).unwrap_or(DType::Float64);
        Block::from_values_as(values, dtype)
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.cols()).map(move |c| self.column_block(c))
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.rows).map(move |r| {
            self.column_map
                .iter()
                .map(|(b, offset)| self.blocks[*b].value(r, *offset))
                .collect()
        })
    }

    /// Select cells by position on both axes
    ///
    /// A single position on one axis collapses it: a single column comes back
    /// as that column, a single row as a row typed by resolving the selected
    /// column types, never as a transposed matrix.
    pub fn extract(&self, rows: &IlocKey, cols: &IlocKey) -> Result<Extracted> {
        let row_sel = rows.resolve(self.rows)?;
        let col_sel = cols.resolve(self.cols())?;
        match (row_sel, col_sel) {
            (Resolved::Single(r), Resolved::Single(c)) => Ok(Extracted::Element(self.value(r, c)?)),
            (Resolved::Many(rs), Resolved::Single(c)) => {
                let column = self.column_block(c);
                if rows.is_identity(self.rows) {
                    Ok(Extracted::Array(column))
                } else {
                    Ok(Extracted::Array(column.take_rows(&rs)))
                }
            }
            (Resolved::Single(r), Resolved::Many(cs)) => Ok(Extracted::Array(self.row_array(r, &cs)?)),
            (Resolved::Many(rs), Resolved::Many(cs)) => {
                let selected = if cols.is_identity(self.cols()) {
                    self.clone()
                } else {
                    self.select_columns(&cs)
                };
                if rows.is_identity(self.rows) {
                    Ok(Extracted::Blocks(selected))
                } else {
                    Ok(Extracted::Blocks(selected.take_rows(&rs)))
                }
            }
        }
    }

    /// Keep the given columns in order, slicing runs out of existing blocks
    pub fn select_columns(&self, positions: &[usize]) -> TypedBlockSet {
        let mut blocks = Vec::new();
        let mut run: Option<(usize, usize, usize)> = None;
        for &p in positions {
            let (b, offset) = self.column_map[p];
            run = match run {
                Some((rb, start, end)) if rb == b && end == offset => Some((rb, start, end + 1)),
                Some(prev) => {
                    blocks.push(self.slice_run(prev));
                    Some((b, offset, offset + 1))
                }
                None => Some((b, offset, offset + 1)),
            };
        }
        if let Some(last) = run {
            blocks.push(self.slice_run(last));
        }
        Self::assemble(blocks, self.rows)
    }

    fn slice_run(&self, (b, start, end): (usize, usize, usize)) -> Block {
        let block = &self.blocks[b];
        if start == 0 && end == block.cols() {
            block.clone()
        } else if end - start == 1 {
            block.column(start)
        } else {
            block.slice_columns(start..end)
        }
    }

    /// Copy the given rows, in order
    pub fn take_rows(&self, positions: &[usize]) -> TypedBlockSet {
        let blocks = self.blocks.iter().map(|b| b.take_rows(positions)).collect();
        Self::assemble(blocks, positions.len())
    }

    /// Append the columns of `other`
    pub fn extend(&self, other: &TypedBlockSet) -> Result<TypedBlockSet> {
        if other.rows != self.rows {
            return Err(Error::Shape(format!(
                "cannot extend {} rows with {} rows",
                self.rows, other.rows
            )));
        }
        let mut blocks = self.blocks.clone();
        blocks.extend(other.blocks.iter().cloned());
        Ok(Self::assemble(blocks, self.rows))
    }

    /// Append one block of columns
    pub fn extend_block(&self, block: Block) -> Result<TypedBlockSet> {
        if block.rows() != self.rows {
            return Err(Error::Shape(format!(
                "cannot extend {} rows with a block of {} rows",
                self.rows,
                block.rows()
            )));
        }
        let mut blocks = self.blocks.clone();
        blocks.push(block);
        Ok(Self::assemble(blocks, self.rows))
    }

    /// Merge adjacent blocks of equal element type
    pub fn consolidate(&self) -> Result<TypedBlockSet> {
        let mut blocks = Vec::new();
        let mut run: Vec<&Block> = Vec::new();
        for block in &self.blocks {
            if run.last().is_some_and(|prev| prev.dtype() != block.dtype()) {
                blocks.push(merge_run(&run)?);
                run.clear();
            }
            run.push(block);
        }
        if !run.is_empty() {
            blocks.push(merge_run(&run)?);
        }
        log::debug!(
            "consolidated {} blocks into {}",
            self.blocks.len(),
            blocks.len()
        );
        Ok(Self::assemble(blocks, self.rows))
    }
}

fn merge_run(run: &[&Block]) -> Result<Block> {
    match run {
        [single] => Ok((*single).clone()),
        many => Block::hstack(many),
    }
}

impl BlockStore for TypedBlockSet {
    fn shape(&self) -> (usize, usize) {
        TypedBlockSet::shape(self)
    }

    fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn dtypes(&self) -> Vec<DType> {
        TypedBlockSet::dtypes(self)
    }

    fn column(&self, col: usize) -> Result<Block> {
        TypedBlockSet::column(self, col)
    }

    fn value(&self, row: usize, col: usize) -> Result<Value> {
        TypedBlockSet::value(self, row, col)
    }
}
