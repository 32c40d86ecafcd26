use super::Frame;
use crate::block::{Block, DType};
use crate::error::{Error, Result};
use crate::index::{AxisIndex, Index};
use crate::series::Series;
use crate::type_blocks::TypedBlockSet;
use crate::value::Label;

/// Input to [`Frame::from_concat`]
#[derive(Debug, Clone)]
pub enum Container {
    Frame(Frame),
    Series(Series),
}

impl From<Frame> for Container {
    fn from(frame: Frame) -> Self {
        Container::Frame(frame)
    }
}

impl From<Series> for Container {
    fn from(series: Series) -> Self {
        Container::Series(series)
    }
}

impl Container {
    /// A frame view of this container along `axis`
    ///
    /// A series becomes one row (axis 0) or one column (axis 1) labelled by
    /// its name.
    fn into_frame(self, axis: usize) -> Result<Frame> {
        let series = match self {
            Container::Frame(frame) => return Ok(frame),
            Container::Series(series) => series,
        };
        let label = AxisIndex::Simple(Index::new([series.name().cloned().unwrap_or(Label::None)])?);
        if axis == 1 {
            let blocks = TypedBlockSet::from_columns(vec![series.values().clone()], series.len())?;
            return Ok(Frame::from_parts(blocks, series.index().clone(), label, None));
        }
        let dtype: DType = series.dtype();
        let row = Block::from_values_shaped(series.to_values(), 1, series.len(), true, dtype)?;
        let blocks = TypedBlockSet::from_blocks([row])?;
        Ok(Frame::from_parts(blocks, label, series.index().clone(), None))
    }
}

impl Frame {
    /// Concatenate frames and series along `axis`
    ///
    /// Axis 0 stacks rows, axis 1 places columns side by side. Labels of the
    /// other axis are combined by union (or intersection when `union` is
    /// false) and every input is aligned to them first. Explicit `index` or
    /// `columns` replace the resulting labels of that axis.
    pub fn from_concat<I>(
        containers: I,
        axis: usize,
        union: bool,
        index: Option<AxisIndex>,
        columns: Option<AxisIndex>,
        name: Option<Label>,
    ) -> Result<Frame>
    where
        I: IntoIterator,
        I::Item: Into<Container>,
    {
        if axis > 1 {
            return Err(Error::InvalidOperation(format!("axis {} does not exist", axis)));
        }
        let frames = containers
            .into_iter()
            .map(|c| c.into().into_frame(axis))
            .collect::<Result<Vec<_>>>()?;
        if frames.is_empty() {
            return Err(Error::Construction("no containers to concatenate".into()));
        }
        log::debug!("concatenating {} containers on axis {}", frames.len(), axis);

        let cross = |frame: &Frame| -> AxisIndex {
            if axis == 0 {
                frame.columns.clone()
            } else {
                frame.index.clone()
            }
        };
        let mut shared = cross(&frames[0]);
        for frame in &frames[1..] {
            let other = cross(frame);
            if !shared.equals(&other) {
                shared = if union {
                    shared.union(&other)?
                } else {
                    shared.intersection(&other)?
                };
            }
        }
        let aligned = frames
            .iter()
            .map(|frame| {
                if axis == 0 {
                    frame.reindex(None, Some(shared.clone()), None)
                } else {
                    frame.reindex(Some(shared.clone()), None, None)
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let sets: Vec<TypedBlockSet> = aligned.iter().map(|f| f.blocks.clone()).collect();
        let along: Vec<&AxisIndex> = aligned
            .iter()
            .map(|f| if axis == 0 { &f.index } else { &f.columns })
            .collect();
        let (blocks, row_labels, col_labels) = if axis == 0 {
            let blocks = TypedBlockSet::concat_rows(&sets)?;
            let labels = match index {
                Some(index) => index,
                None => AxisIndex::concat(&along)?,
            };
            (blocks, labels, columns.unwrap_or(shared))
        } else {
            let blocks = TypedBlockSet::concat_columns(&sets)?;
            let labels = match columns {
                Some(columns) => columns,
                None => AxisIndex::concat(&along)?,
            };
            (blocks, index.unwrap_or(shared), labels)
        };
        let frame = Frame::from_blocks(blocks, Some(row_labels), Some(col_labels))?;
        Ok(frame.rename(name))
    }
}
