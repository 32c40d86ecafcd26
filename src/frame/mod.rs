//! Two-dimensional labelled data
//!
//! A [`Frame`] binds a [`TypedBlockSet`] to row and column labels. Frames
//! never change after construction; selection, alignment and assignment all
//! return new frames that share untouched blocks with their source.

mod assign;
mod concat;
mod group;
mod growable;
mod ops;
mod reindex;
mod selection;
mod transform;

pub use assign::AssignValue;
pub use concat::Container;
pub(crate) use group::group_positions;
pub use growable::GrowableFrame;
pub use selection::Selection;
pub use transform::DropCondition;

use std::collections::HashSet;

use crate::block::{Block, DType, IlocKey};
use crate::error::{Error, Result};
use crate::index::AxisIndex;
use crate::series::Series;
use crate::type_blocks::TypedBlockSet;
use crate::value::{Label, Value};

/// Data handed to [`Frame::init`]
#[derive(Debug, Clone)]
pub enum FrameData {
    /// No values; only valid when an axis has zero length
    Empty,
    /// One value filling every cell
    Element(Value),
    /// Existing blocks, referenced as given
    Blocks(TypedBlockSet),
    /// One-dimensional columns of equal length
    Columns(Vec<Block>),
    /// Row-wise values, one entry per column
    Records(Vec<Vec<Value>>),
}

/// Immutable two-dimensional container with labelled axes
#[derive(Debug, Clone)]
pub struct Frame {
    blocks: TypedBlockSet,
    index: AxisIndex,
    columns: AxisIndex,
    name: Option<Label>,
}

fn check_axis_len(axis: &str, expected: usize, labels: &AxisIndex) -> Result<()> {
    if labels.len() != expected {
        return Err(Error::Shape(format!(
            "{} labels of length {} for {} positions",
            axis,
            labels.len(),
            expected
        )));
    }
    Ok(())
}

impl Frame {
    pub(crate) fn from_parts(
        blocks: TypedBlockSet,
        index: AxisIndex,
        columns: AxisIndex,
        name: Option<Label>,
    ) -> Self {
        Frame {
            blocks,
            index,
            columns,
            name,
        }
    }

    /// General constructor
    ///
    /// Omitted labels become `0..n` ranges sized from the data. Without data,
    /// index and columns may not both be non-empty. A fill element needs both
    /// index and columns, each of non-zero length.
    pub fn init(data: FrameData, index: Option<AxisIndex>, columns: Option<AxisIndex>) -> Result<Frame> {
        match data {
            FrameData::Empty => {
                let rows = index.as_ref().map(AxisIndex::len).unwrap_or(0);
                let cols = columns.as_ref().map(AxisIndex::len).unwrap_or(0);
                if rows > 0 && cols > 0 {
                    return Err(Error::Construction(format!(
                        "no data given for {} rows by {} columns",
                        rows, cols
                    )));
                }
                let blocks = if cols == 0 {
                    TypedBlockSet::empty(rows)
                } else {
                    let empty = (0..cols).map(|_| Block::from_vec(Vec::<f64>::new())).collect();
                    TypedBlockSet::from_columns(empty, 0)?
                };
                Frame::from_blocks(blocks, index, columns)
            }
            FrameData::Element(value) => {
                let (index, columns) = match (index, columns) {
                    (Some(index), Some(columns)) => (index, columns),
                    _ => {
                        return Err(Error::Construction(
                            "a fill value needs both index and columns".into(),
                        ))
                    }
                };
                if index.is_empty() || columns.is_empty() {
                    return Err(Error::Construction(
                        "cannot fill a zero-length axis with a value".into(),
                    ));
                }
                let blocks = TypedBlockSet::from_element(&value, index.len(), columns.len())?;
                Ok(Frame::from_parts(blocks, index, columns, None))
            }
            FrameData::Blocks(blocks) => Frame::from_blocks(blocks, index, columns),
            FrameData::Columns(data) => {
                let rows = data
                    .first()
                    .map(Block::rows)
                    .or_else(|| index.as_ref().map(AxisIndex::len))
                    .unwrap_or(0);
                let blocks = TypedBlockSet::from_columns(data, rows)?;
                Frame::from_blocks(blocks, index, columns)
            }
            FrameData::Records(records) => Frame::from_records(records, index, columns),
        }
    }

    /// Bind labels to existing blocks without copying them
    pub fn from_blocks(blocks: TypedBlockSet, index: Option<AxisIndex>, columns: Option<AxisIndex>) -> Result<Frame> {
        let index = index.unwrap_or_else(|| AxisIndex::range(blocks.rows()));
        let columns = columns.unwrap_or_else(|| AxisIndex::range(blocks.cols()));
        check_axis_len("index", blocks.rows(), &index)?;
        check_axis_len("columns", blocks.cols(), &columns)?;
        Ok(Frame::from_parts(blocks, index, columns, None))
    }

    /// Every cell set to `value`
    pub fn from_element(value: impl Into<Value>, index: AxisIndex, columns: AxisIndex) -> Result<Frame> {
        Frame::init(FrameData::Element(value.into()), Some(index), Some(columns))
    }

    /// Labelled series as columns
    ///
    /// Each series is aligned to `index`; without one, the union of the series
    /// labels is used in first-seen order.
    pub fn from_columns<I, L>(items: I, index: Option<AxisIndex>) -> Result<Frame>
    where
        I: IntoIterator<Item = (L, Series)>,
        L: Into<Label>,
    {
        let items: Vec<(Label, Series)> = items.into_iter().map(|(l, s)| (l.into(), s)).collect();
        let index = match index {
            Some(index) => index,
            None => {
                let mut iter = items.iter().map(|(_, s)| s.index().clone());
                let first = iter.next().unwrap_or_else(|| AxisIndex::range(0));
                iter.try_fold(first, |acc, next| acc.union(&next))?
            }
        };
        let mut labels = Vec::with_capacity(items.len());
        let mut data = Vec::with_capacity(items.len());
        for (label, series) in items {
            labels.push(label);
            data.push(series.reindex(index.clone(), None)?.values().clone());
        }
        let blocks = TypedBlockSet::from_columns(data, index.len())?;
        Frame::from_blocks(blocks, Some(index), Some(AxisIndex::from_labels(labels)?))
    }

    /// Label and values pairs as columns, each typed by inference
    pub fn from_items<I, L, V>(items: I, index: Option<AxisIndex>) -> Result<Frame>
    where
        I: IntoIterator<Item = (L, Vec<V>)>,
        L: Into<Label>,
        V: Into<Value>,
    {
        let mut labels = Vec::new();
        let mut data = Vec::new();
        for (label, values) in items {
            labels.push(label.into());
            data.push(Block::from_values(values.into_iter().map(Into::into).collect()));
        }
        let columns = AxisIndex::from_labels(labels)?;
        Frame::init(FrameData::Columns(data), index, Some(columns))
    }

    /// Row-wise values; each column is typed by inference over its values
    pub fn from_records(records: Vec<Vec<Value>>, index: Option<AxisIndex>, columns: Option<AxisIndex>) -> Result<Frame> {
        let cols = records
            .first()
            .map(Vec::len)
            .or_else(|| columns.as_ref().map(AxisIndex::len))
            .unwrap_or(0);
        if let Some(bad) = records.iter().find(|r| r.len() != cols) {
            return Err(Error::LengthMismatch {
                expected: cols,
                actual: bad.len(),
            });
        }
        let rows = records.len();
        let mut data: Vec<Vec<Value>> = (0..cols).map(|_| Vec::with_capacity(rows)).collect();
        for record in records {
            for (column, value) in data.iter_mut().zip(record) {
                column.push(value);
            }
        }
        let blocks = TypedBlockSet::from_columns(data.into_iter().map(Block::from_values).collect(), rows)?;
        Frame::from_blocks(blocks, index, columns)
    }

    /// Inverse of [`Frame::to_pairs`]
    ///
    /// Inner labels missing from an outer group become `None`.
    pub fn from_pairs(pairs: Vec<(Label, Vec<(Label, Value)>)>, axis: usize) -> Result<Frame> {
        if axis > 1 {
            return Err(Error::InvalidOperation(format!("axis {} does not exist", axis)));
        }
        let mut inner: Vec<Label> = Vec::new();
        let mut seen: HashSet<Label> = HashSet::new();
        for (_, items) in &pairs {
            for (label, _) in items {
                if seen.insert(label.clone()) {
                    inner.push(label.clone());
                }
            }
        }
        let inner_index = AxisIndex::infer(inner)?;
        let (outer, groups): (Vec<Label>, Vec<Vec<(Label, Value)>>) = pairs.into_iter().unzip();
        let outer_index = AxisIndex::infer(outer)?;
        let mut grid: Vec<Vec<Value>> = Vec::with_capacity(groups.len());
        for items in groups {
            let mut values = vec![Value::None; inner_index.len()];
            for (label, value) in items {
                if let Some(p) = inner_index.position(&label) {
                    values[p] = value;
                }
            }
            grid.push(values);
        }
        if axis == 0 {
            let data = grid.into_iter().map(Block::from_values).collect();
            let blocks = TypedBlockSet::from_columns(data, inner_index.len())?;
            Frame::from_blocks(blocks, Some(inner_index), Some(outer_index))
        } else {
            Frame::from_records(grid, Some(outer_index), Some(inner_index))
        }
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.blocks.shape()
    }

    pub fn row_count(&self) -> usize {
        self.blocks.rows()
    }

    pub fn column_count(&self) -> usize {
        self.blocks.cols()
    }

    pub fn index(&self) -> &AxisIndex {
        &self.index
    }

    pub fn columns(&self) -> &AxisIndex {
        &self.columns
    }

    pub fn name(&self) -> Option<&Label> {
        self.name.as_ref()
    }

    /// Copy with a new name; blocks are shared
    pub fn rename(&self, name: Option<Label>) -> Frame {
        let mut frame = self.clone();
        frame.name = name;
        frame
    }

    pub fn blocks(&self) -> &TypedBlockSet {
        &self.blocks
    }

    pub fn dtypes(&self) -> Vec<DType> {
        self.blocks.dtypes()
    }

    /// Columns as series sharing the frame's blocks
    pub fn iter_columns(&self) -> impl Iterator<Item = Series> + '_ {
        (0..self.column_count()).map(move |c| self.column_series(c))
    }

    /// Column label and column series pairs
    pub fn items(&self) -> impl Iterator<Item = (Label, Series)> + '_ {
        (0..self.column_count()).filter_map(move |c| Some((self.columns.label_at(c)?, self.column_series(c))))
    }

    /// Rows as series labelled by the columns, values typed by inference
    pub fn iter_rows(&self) -> impl Iterator<Item = Series> + '_ {
        self.blocks.iter_rows().enumerate().map(move |(r, row)| {
            Series::from_parts(
                Block::from_values(row),
                self.columns.clone(),
                self.index.label_at(r),
            )
        })
    }

    pub(crate) fn column_series(&self, col: usize) -> Series {
        Series::from_parts(
            self.blocks.column_block(col),
            self.index.clone(),
            self.columns.label_at(col),
        )
    }

    /// Nested label and value pairs: column-wise for axis 0, row-wise for 1
    pub fn to_pairs(&self, axis: usize) -> Result<Vec<(Label, Vec<(Label, Value)>)>> {
        let row_labels = self.index.labels();
        let col_labels = self.columns.labels();
        match axis {
            0 => Ok(col_labels
                .into_iter()
                .enumerate()
                .map(|(c, label)| {
                    let column = self.blocks.column_block(c);
                    let values = row_labels
                        .iter()
                        .enumerate()
                        .map(|(r, row)| (row.clone(), column.value(r, 0)))
                        .collect();
                    (label, values)
                })
                .collect()),
            1 => Ok(row_labels
                .into_iter()
                .zip(self.blocks.iter_rows())
                .map(|(label, row)| (label, col_labels.iter().cloned().zip(row).collect()))
                .collect()),
            other => Err(Error::InvalidOperation(format!("axis {} does not exist", other))),
        }
    }

    /// Rows selected by position as a frame, never collapsed
    pub(crate) fn take_rows(&self, positions: Vec<usize>) -> Result<Frame> {
        let index = self.index.select(&IlocKey::List(positions.clone()))?;
        let blocks = self.blocks.take_rows(&positions);
        Ok(Frame::from_parts(blocks, index, self.columns.clone(), self.name.clone()))
    }

    /// Columns selected by position as a frame, never collapsed
    pub(crate) fn take_columns(&self, positions: Vec<usize>) -> Result<Frame> {
        let columns = self.columns.select(&IlocKey::List(positions.clone()))?;
        let blocks = self.blocks.select_columns(&positions);
        Ok(Frame::from_parts(blocks, self.index.clone(), columns, self.name.clone()))
    }

    /// First `n` rows
    pub fn head(&self, n: usize) -> Result<Frame> {
        self.take_rows((0..n.min(self.row_count())).collect())
    }

    /// Last `n` rows
    pub fn tail(&self, n: usize) -> Result<Frame> {
        let start = self.row_count().saturating_sub(n);
        self.take_rows((start..self.row_count()).collect())
    }

    /// Copy without the named columns
    pub fn drop_columns(&self, labels: &[Label]) -> Result<Frame> {
        let mut drop = HashSet::with_capacity(labels.len());
        for label in labels {
            let position = self
                .columns
                .position(label)
                .ok_or_else(|| Error::KeyNotFound(format!("{}", label)))?;
            drop.insert(position);
        }
        self.take_columns((0..self.column_count()).filter(|c| !drop.contains(c)).collect())
    }

    /// Growable copy sharing the current blocks
    pub fn to_growable(&self) -> Result<GrowableFrame> {
        GrowableFrame::from_frame(self)
    }
}
