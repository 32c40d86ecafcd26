use std::collections::HashMap;

use super::TypedBlockSet;
use crate::block::{Block, DType};
use crate::error::{Error, Result};
use crate::value::Value;

/// Values written by [`TypedBlockSet::assign`]
#[derive(Debug, Clone)]
pub enum AssignGrid {
    /// The same value in every selected cell
    Element(Value),
    /// One row of values per selected row, one entry per selected column
    Rows(Vec<Vec<Value>>),
}

impl AssignGrid {
    fn get(&self, row: usize, col: usize) -> &Value {
        match self {
            AssignGrid::Element(v) => v,
            AssignGrid::Rows(rows) => &rows[row][col],
        }
    }
}

impl TypedBlockSet {
    /// Place sets side by side; blocks are referenced, not copied
    pub fn concat_columns(sets: &[TypedBlockSet]) -> Result<TypedBlockSet> {
        let rows = sets.first().map(TypedBlockSet::rows).unwrap_or(0);
        let mut blocks = Vec::new();
        for set in sets {
            if set.rows() != rows {
                return Err(Error::Shape(format!(
                    "cannot concatenate {} rows beside {} rows",
                    set.rows(),
                    rows
                )));
            }
            blocks.extend(set.blocks().iter().cloned());
        }
        log::debug!("concatenated {} block sets by column", sets.len());
        Ok(TypedBlockSet::assemble(blocks, rows))
    }

    /// Stack sets top to bottom
    ///
    /// When every set has the same block layout the blocks are stacked pairwise
    /// and keep their types; otherwise columns are promoted one by one and the
    /// result is consolidated.
    pub fn concat_rows(sets: &[TypedBlockSet]) -> Result<TypedBlockSet> {
        let first = match sets.first() {
            Some(first) => first,
            None => return Ok(TypedBlockSet::empty(0)),
        };
        let cols = first.cols();
        if let Some(bad) = sets.iter().find(|s| s.cols() != cols) {
            return Err(Error::Shape(format!(
                "cannot stack {} columns onto {} columns",
                bad.cols(),
                cols
            )));
        }
        let rows: usize = sets.iter().map(TypedBlockSet::rows).sum();
        let signature = |set: &TypedBlockSet| -> Vec<(DType, usize)> {
            set.blocks().iter().map(|b| (b.dtype(), b.cols())).collect()
        };
        let head = signature(first);
        log::debug!("concatenating {} block sets by row", sets.len());
        if sets.iter().all(|s| signature(s) == head) {
            let blocks = (0..first.block_count())
                .map(|b| {
                    let parts: Vec<&Block> = sets.iter().map(|s| &s.blocks()[b]).collect();
                    Block::vstack(&parts)
                })
                .collect::<Result<Vec<_>>>()?;
            return Ok(TypedBlockSet::assemble(blocks, rows));
        }
        let columns = (0..cols)
            .map(|c| {
                let dtype = DType::resolve_all(sets.iter().map(|s| s.column_block(c).dtype()))
                    .unwrap_or(DType::Object);
                let parts = sets
                    .iter()
                    .map(|s| s.column_block(c).astype(dtype))
                    .collect::<Result<Vec<_>>>()?;
                let refs: Vec<&Block> = parts.iter().collect();
                Block::vstack(&refs)
            })
            .collect::<Result<Vec<_>>>()?;
        TypedBlockSet::from_columns(columns, rows)
    }

    /// Rows by source position; `None` positions receive `fill`
    ///
    /// Without an explicit fill the missing sentinel of each column type is
    /// used. An identity mapping returns the same blocks.
    pub fn take_rows_filled(&self, positions: &[Option<usize>], fill: Option<&Value>) -> Result<TypedBlockSet> {
        let identity = positions.len() == self.rows()
            && positions.iter().enumerate().all(|(i, p)| *p == Some(i));
        if identity {
            return Ok(self.clone());
        }
        log::debug!("copying {} rows for reindex", positions.len());
        let blocks = self
            .blocks()
            .iter()
            .map(|b| b.take_rows_filled(positions, fill))
            .collect::<Result<Vec<_>>>()?;
        Ok(TypedBlockSet::assemble(blocks, positions.len()))
    }

    /// Columns by source position; `None` positions become filled columns
    pub fn take_columns_filled(&self, positions: &[Option<usize>], fill: Option<&Value>) -> Result<TypedBlockSet> {
        let filler = fill.cloned().unwrap_or(Value::Float(f64::NAN));
        let mut blocks = Vec::new();
        let mut run: Vec<usize> = Vec::new();
        for position in positions {
            match position {
                Some(p) => {
                    if *p >= self.cols() {
                        return Err(Error::IndexOutOfBounds {
                            index: *p,
                            size: self.cols(),
                        });
                    }
                    run.push(*p);
                }
                None => {
                    if !run.is_empty() {
                        blocks.extend(self.select_columns(&run).blocks().iter().cloned());
                        run.clear();
                    }
                    blocks.push(Block::full(&filler, self.rows())?);
                }
            }
        }
        if !run.is_empty() {
            blocks.extend(self.select_columns(&run).blocks().iter().cloned());
        }
        Ok(TypedBlockSet::assemble(blocks, self.rows()))
    }

    /// Write `values` into the cells at `rows` x `cols`
    ///
    /// Only touched columns are rebuilt, each typed by resolving its source
    /// type with the types written into it. Untouched columns keep sharing
    /// their source blocks.
    pub fn assign(&self, rows: &[usize], cols: &[usize], values: &AssignGrid) -> Result<TypedBlockSet> {
        if let AssignGrid::Rows(grid) = values {
            if grid.len() != rows.len() {
                return Err(Error::LengthMismatch {
                    expected: rows.len(),
                    actual: grid.len(),
                });
            }
            if let Some(bad) = grid.iter().find(|r| r.len() != cols.len()) {
                return Err(Error::LengthMismatch {
                    expected: cols.len(),
                    actual: bad.len(),
                });
            }
        }
        for &r in rows {
            if r >= self.rows() {
                return Err(Error::IndexOutOfBounds {
                    index: r,
                    size: self.rows(),
                });
            }
        }
        let mut targets: HashMap<usize, usize> = HashMap::new();
        for (j, &c) in cols.iter().enumerate() {
            if c >= self.cols() {
                return Err(Error::IndexOutOfBounds {
                    index: c,
                    size: self.cols(),
                });
            }
            targets.insert(c, j);
        }

        let mut blocks = Vec::new();
        let mut run: Vec<usize> = Vec::new();
        for c in 0..self.cols() {
            let j = match targets.get(&c) {
                Some(j) => *j,
                None => {
                    run.push(c);
                    continue;
                }
            };
            if !run.is_empty() {
                blocks.extend(self.select_columns(&run).blocks().iter().cloned());
                run.clear();
            }
            let column = self.column_block(c);
            let mut dtype = column.dtype();
            let mut data = column.column_values(0);
            for (i, &r) in rows.iter().enumerate() {
                let value = values.get(i, j);
                dtype = dtype.resolve(value.dtype());
                data[r] = value.clone();
            }
            blocks.push(Block::from_values_as(data, dtype)?);
        }
        if !run.is_empty() {
            blocks.extend(self.select_columns(&run).blocks().iter().cloned());
        }
        Ok(TypedBlockSet::assemble(blocks, self.rows()))
    }
}
