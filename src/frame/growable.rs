use super::{AssignValue, Frame};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::index::{AxisIndex, GrowableIndex};
use crate::type_blocks::{BlockStore, GrowableBlockSet};
use crate::value::Label;

/// Frame that can gain columns
///
/// Rows are fixed by the index given at creation. Inserted columns are never
/// modified; [`GrowableFrame::to_frame`] snapshots the current state as an
/// immutable [`Frame`] sharing the same blocks.
#[derive(Debug, Clone)]
pub struct GrowableFrame {
    blocks: GrowableBlockSet,
    index: AxisIndex,
    columns: GrowableIndex,
}

impl GrowableFrame {
    pub fn new(index: AxisIndex) -> Self {
        GrowableFrame {
            blocks: GrowableBlockSet::new(index.len()),
            index,
            columns: GrowableIndex::new(),
        }
    }

    pub(crate) fn from_frame(frame: &Frame) -> Result<Self> {
        Ok(GrowableFrame {
            blocks: GrowableBlockSet::from(frame.blocks.clone()),
            index: frame.index.clone(),
            columns: GrowableIndex::from(frame.columns.flatten()?),
        })
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

    fn check_new(&self, label: &Label) -> Result<()> {
        if self.columns.position(label).is_some() {
            return Err(Error::DuplicateLabel(format!("{}", label)));
        }
        Ok(())
    }

    /// Append one column
    ///
    /// A series is aligned to the index; labels it lacks get the missing
    /// sentinel of its type.
    pub fn insert(&mut self, label: impl Into<Label>, value: impl Into<AssignValue>) -> Result<()> {
        let label = label.into();
        self.check_new(&label)?;
        let rows = self.row_count();
        let column = match value.into() {
            AssignValue::Element(value) => Block::full(&value, rows)?,
            AssignValue::Values(values) => {
                if values.len() != rows {
                    return Err(Error::LengthMismatch {
                        expected: rows,
                        actual: values.len(),
                    });
                }
                Block::from_values(values)
            }
            AssignValue::Series(series) => series.reindex(self.index.clone(), None)?.values().clone(),
            AssignValue::Grid(_) | AssignValue::Frame(_) => {
                return Err(Error::InvalidOperation(
                    "insert takes one column; use extend for frames".into(),
                ))
            }
        };
        self.blocks.append_column(column)?;
        self.columns.append(label)
    }

    /// Append every column of `frame`, aligned to the index
    pub fn extend(&mut self, frame: &Frame) -> Result<()> {
        let labels = frame.columns.labels();
        for label in &labels {
            self.check_new(label)?;
        }
        let aligned = frame.reindex(Some(self.index.clone()), None, None)?;
        self.blocks.append_set(&aligned.blocks)?;
        self.columns.extend(labels)
    }

    /// Immutable snapshot sharing the current blocks
    pub fn to_frame(&self) -> Frame {
        Frame::from_parts(
            self.blocks.snapshot(),
            self.index.clone(),
            AxisIndex::Simple(self.columns.to_index()),
            None,
        )
    }
}
