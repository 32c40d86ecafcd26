use std::cmp::Ordering;
use std::collections::HashSet;

use super::{check_axis_len, group_positions, Frame};
use crate::block::{Block, IlocKey};
use crate::error::{Error, Result};
use crate::index::{AxisIndex, LocKey};
use crate::series::Series;
use crate::type_blocks::TypedBlockSet;
use crate::value::{Label, Value, ValueKey};

/// Which missing values cause [`Frame::dropna`] to drop a row or column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropCondition {
    /// Every value is missing
    #[default]
    All,
    /// At least one value is missing
    Any,
}

fn check_axis(axis: usize) -> Result<()> {
    if axis > 1 {
        return Err(Error::InvalidOperation(format!("axis {} does not exist", axis)));
    }
    Ok(())
}

/// Missing values sort last in either direction
fn sort_order(a: &Value, b: &Value, ascending: bool) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ if ascending => a.total_cmp(b),
        _ => b.total_cmp(a),
    }
}

/// Source position for each target position after moving by `shift`
fn shifted(len: usize, shift: isize) -> Vec<Option<usize>> {
    (0..len)
        .map(|p| {
            let source = p as isize - shift;
            (source >= 0 && (source as usize) < len).then_some(source as usize)
        })
        .collect()
}

fn rolled(len: usize, shift: isize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let n = len as isize;
    (0..n).map(|p| (p - shift).rem_euclid(n) as usize).collect()
}

/// Duplicate flags over grouped positions
fn duplicate_flags(values: Vec<Value>, exclude_first: bool, exclude_last: bool) -> Vec<bool> {
    let mut flags = vec![false; values.len()];
    for (_, positions) in group_positions(values) {
        if positions.len() < 2 {
            continue;
        }
        let last = positions.len() - 1;
        for (i, p) in positions.into_iter().enumerate() {
            flags[p] = !((exclude_first && i == 0) || (exclude_last && i == last));
        }
    }
    flags
}

impl Frame {
    /// Rows reordered by their labels
    pub fn sort_index(&self, ascending: bool) -> Result<Frame> {
        self.take_rows(sorted_positions(&self.index, ascending))
    }

    /// Columns reordered by their labels
    pub fn sort_columns(&self, ascending: bool) -> Result<Frame> {
        self.take_columns(sorted_positions(&self.columns, ascending))
    }

    /// Reorder by values
    ///
    /// Axis 0 orders rows by the values of the columns named in `keys`; axis 1
    /// orders columns by the values of the rows named in `keys`. Later keys
    /// break ties in earlier ones, equal entries keep their order, and missing
    /// values go last.
    pub fn sort_values(&self, keys: &[Label], axis: usize, ascending: bool) -> Result<Frame> {
        check_axis(axis)?;
        if keys.is_empty() {
            return Err(Error::InvalidOperation("no sort keys given".into()));
        }
        let lookup = if axis == 0 { &self.columns } else { &self.index };
        let mut vectors = Vec::with_capacity(keys.len());
        for key in keys {
            let position = lookup
                .position(key)
                .ok_or_else(|| Error::KeyNotFound(format!("{}", key)))?;
            vectors.push(if axis == 0 {
                self.blocks.column(position)?.column_values(0)
            } else {
                self.blocks.row(position)?
            });
        }
        let len = if axis == 0 { self.row_count() } else { self.column_count() };
        let mut positions: Vec<usize> = (0..len).collect();
        positions.sort_by(|&a, &b| {
            vectors
                .iter()
                .map(|values| sort_order(&values[a], &values[b], ascending))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
        if axis == 0 {
            self.take_rows(positions)
        } else {
            self.take_columns(positions)
        }
    }

    /// Drop rows (axis 0) or columns (axis 1) holding missing values
    pub fn dropna(&self, axis: usize, condition: DropCondition) -> Result<Frame> {
        check_axis(axis)?;
        let missing = self.blocks.isna();
        let flags: Vec<Vec<bool>> = if axis == 0 {
            missing
                .iter_rows()
                .map(|row| row.iter().map(Value::truthy).collect())
                .collect()
        } else {
            missing
                .iter_columns()
                .map(|column| column.column_values(0).iter().map(Value::truthy).collect())
                .collect()
        };
        let keep: Vec<usize> = flags
            .iter()
            .enumerate()
            .filter(|(_, f)| {
                let drop = match condition {
                    DropCondition::All => !f.is_empty() && f.iter().all(|m| *m),
                    DropCondition::Any => f.iter().any(|m| *m),
                };
                !drop
            })
            .map(|(p, _)| p)
            .collect();
        if keep.len() == flags.len() {
            return Ok(self.clone());
        }
        if axis == 0 {
            self.take_rows(keep)
        } else {
            self.take_columns(keep)
        }
    }

    /// Swap rows and columns; each new column is typed by inference
    pub fn transpose(&self) -> Result<Frame> {
        let columns = self.blocks.iter_rows().map(Block::from_values).collect();
        let blocks = TypedBlockSet::from_columns(columns, self.column_count())?;
        Ok(Frame::from_parts(
            blocks,
            self.columns.clone(),
            self.index.clone(),
            self.name.clone(),
        ))
    }

    /// Move values down `rows` positions and right `columns` positions,
    /// leaving labels in place
    ///
    /// Vacated cells receive `fill_value`, or the missing sentinel of each
    /// column type when no fill is given.
    pub fn shift(&self, rows: isize, columns: isize, fill_value: Option<&Value>) -> Result<Frame> {
        let mut blocks = self.blocks.clone();
        if rows != 0 {
            blocks = blocks.take_rows_filled(&shifted(self.row_count(), rows), fill_value)?;
        }
        if columns != 0 {
            blocks = blocks.take_columns_filled(&shifted(self.column_count(), columns), fill_value)?;
        }
        Ok(self.with_blocks(blocks))
    }

    /// Rotate values by `rows` and `columns` positions, wrapping at the ends
    ///
    /// Labels stay in place unless `include_index` / `include_columns` rotate
    /// them together with the values.
    pub fn roll(&self, rows: isize, columns: isize, include_index: bool, include_columns: bool) -> Result<Frame> {
        let moved = self
            .take_rows(rolled(self.row_count(), rows))?
            .take_columns(rolled(self.column_count(), columns))?;
        let index = if include_index { moved.index } else { self.index.clone() };
        let columns = if include_columns { moved.columns } else { self.columns.clone() };
        Ok(Frame::from_parts(moved.blocks, index, columns, self.name.clone()))
    }

    /// Boolean frame marking elements equal to any of `values`
    pub fn isin(&self, values: &[Value]) -> Frame {
        self.with_blocks(
            self.blocks
                .map_values(|v| Value::Bool(values.iter().any(|other| v.semantic_eq(other)))),
        )
    }

    /// Distinct elements across the frame in sorted order
    pub fn unique(&self) -> Vec<Value> {
        let mut seen = HashSet::new();
        let mut values: Vec<Value> = self
            .iter_element()
            .filter(|v| seen.insert(ValueKey(v.clone())))
            .collect();
        values.sort_by(Value::total_cmp);
        values
    }

    /// Flag rows (axis 0) or columns (axis 1) whose values repeat another's
    ///
    /// The first or last of each repeated group can be left unflagged.
    pub fn duplicated(&self, axis: usize, exclude_first: bool, exclude_last: bool) -> Result<Series> {
        check_axis(axis)?;
        let (vectors, labels) = if axis == 0 {
            (self.blocks.iter_rows().collect::<Vec<_>>(), self.index.clone())
        } else {
            let columns: Vec<Vec<Value>> = self.blocks.iter_columns().map(|c| c.column_values(0)).collect();
            (columns, self.columns.clone())
        };
        let keys = vectors.into_iter().map(Value::Tuple).collect();
        let flags = duplicate_flags(keys, exclude_first, exclude_last);
        Ok(Series::from_parts(Block::from_vec(flags), labels, None))
    }

    /// Copy without the rows (axis 0) or columns (axis 1) flagged by
    /// [`Frame::duplicated`]
    pub fn drop_duplicated(&self, axis: usize, exclude_first: bool, exclude_last: bool) -> Result<Frame> {
        let flags = self.duplicated(axis, exclude_first, exclude_last)?.to_values();
        let keep = flags
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.truthy())
            .map(|(p, _)| p)
            .collect();
        if axis == 0 {
            self.take_rows(keep)
        } else {
            self.take_columns(keep)
        }
    }

    /// Limit every element to the inclusive range given by `lower` and `upper`
    ///
    /// Missing values and values that do not compare with a bound pass
    /// through unchanged.
    pub fn clip(&self, lower: Option<&Value>, upper: Option<&Value>) -> Result<Frame> {
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo.compare(hi) == Some(Ordering::Greater) {
                return Err(Error::InvalidOperation(format!(
                    "lower bound {} exceeds upper bound {}",
                    lo, hi
                )));
            }
        }
        let clip = |v: &Value| {
            if v.is_missing() {
                return v.clone();
            }
            if let Some(lo) = lower {
                if v.compare(lo) == Some(Ordering::Less) {
                    return lo.clone();
                }
            }
            if let Some(hi) = upper {
                if v.compare(hi) == Some(Ordering::Greater) {
                    return hi.clone();
                }
            }
            v.clone()
        };
        Ok(self.with_blocks(self.blocks.map_values(clip)))
    }

    /// Replace row and/or column labels of matching length; blocks are shared
    pub fn relabel(&self, index: Option<AxisIndex>, columns: Option<AxisIndex>) -> Result<Frame> {
        let index = match index {
            Some(index) => {
                check_axis_len("index", self.row_count(), &index)?;
                index
            }
            None => self.index.clone(),
        };
        let columns = match columns {
            Some(columns) => {
                check_axis_len("columns", self.column_count(), &columns)?;
                columns
            }
            None => self.columns.clone(),
        };
        Ok(Frame::from_parts(self.blocks.clone(), index, columns, self.name.clone()))
    }

    /// Map every row label through `f`
    pub fn relabel_index<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&Label) -> Label,
    {
        self.relabel(Some(self.index.relabel(f)?), None)
    }

    /// Map every column label through `f`
    pub fn relabel_columns<F>(&self, f: F) -> Result<Frame>
    where
        F: Fn(&Label) -> Label,
    {
        self.relabel(None, Some(self.columns.relabel(f)?))
    }

    /// Every element in row-major order
    pub fn iter_element(&self) -> impl Iterator<Item = Value> + '_ {
        self.blocks.iter_rows().flatten()
    }

    /// Every element with its (row, column) labels, in row-major order
    pub fn iter_element_items(&self) -> impl Iterator<Item = ((Label, Label), Value)> + '_ {
        let rows = self.index.labels();
        let columns = self.columns.labels();
        self.blocks
            .iter_rows()
            .zip(rows)
            .flat_map(move |(values, row)| {
                columns
                    .clone()
                    .into_iter()
                    .zip(values)
                    .map(move |(column, value)| ((row.clone(), column), value))
            })
    }

    /// Boolean frame marking the cells a positional selection would return
    pub fn mask_iloc(&self, rows: impl Into<IlocKey>, cols: impl Into<IlocKey>) -> Result<Frame> {
        let rows: IlocKey = rows.into();
        let cols: IlocKey = cols.into();
        let rows: HashSet<usize> = rows.resolve(self.row_count())?.positions().into_iter().collect();
        let cols: HashSet<usize> = cols.resolve(self.column_count())?.positions().into_iter().collect();
        let data = (0..self.column_count())
            .map(|c| {
                let mask: Vec<bool> = (0..self.row_count())
                    .map(|r| cols.contains(&c) && rows.contains(&r))
                    .collect();
                Block::from_vec(mask)
            })
            .collect();
        let blocks = TypedBlockSet::from_columns(data, self.row_count())?;
        Ok(self.with_blocks(blocks))
    }

    /// Boolean frame marking the cells a label selection would return
    pub fn mask_loc(&self, rows: impl Into<LocKey>, cols: impl Into<LocKey>) -> Result<Frame> {
        let rows = self.index.loc_to_iloc(&rows.into())?;
        let cols = self.columns.loc_to_iloc(&cols.into())?;
        self.mask_iloc(rows, cols)
    }
}

fn sorted_positions(labels: &AxisIndex, ascending: bool) -> Vec<usize> {
    let labels = labels.labels();
    let mut positions: Vec<usize> = (0..labels.len()).collect();
    if ascending {
        positions.sort_by(|&a, &b| labels[a].cmp(&labels[b]));
    } else {
        positions.sort_by(|&a, &b| labels[b].cmp(&labels[a]));
    }
    positions
}
