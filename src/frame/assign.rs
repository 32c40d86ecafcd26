use super::Frame;
use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::index::LocKey;
use crate::series::Series;
use crate::type_blocks::AssignGrid;
use crate::value::Value;

/// Values written by an assignment
#[derive(Debug, Clone)]
pub enum AssignValue {
    /// One value for every selected cell
    Element(Value),
    /// One value per selected position along the single selected row or
    /// column
    Values(Vec<Value>),
    /// One row of values per selected row
    Grid(Vec<Vec<Value>>),
    /// Labelled values aligned to the selection
    Series(Series),
    /// Labelled values aligned on both axes
    Frame(Frame),
}

impl From<Value> for AssignValue {
    fn from(value: Value) -> Self {
        AssignValue::Element(value)
    }
}

impl From<Vec<Value>> for AssignValue {
    fn from(values: Vec<Value>) -> Self {
        AssignValue::Values(values)
    }
}

impl From<Series> for AssignValue {
    fn from(series: Series) -> Self {
        AssignValue::Series(series)
    }
}

impl From<Frame> for AssignValue {
    fn from(frame: Frame) -> Self {
        AssignValue::Frame(frame)
    }
}

impl Frame {
    /// Copy with the cells selected by label set to `value`
    pub fn assign_loc(
        &self,
        rows: impl Into<LocKey>,
        cols: impl Into<LocKey>,
        value: impl Into<AssignValue>,
    ) -> Result<Frame> {
        let rows = self.index.loc_to_iloc(&rows.into())?;
        let cols = self.columns.loc_to_iloc(&cols.into())?;
        self.assign_iloc(rows, cols, value)
    }

    /// Copy with the cells selected by position set to `value`
    ///
    /// Only the touched columns are rebuilt. Series and frame values are
    /// aligned by label; cells whose labels they lack keep their current
    /// value. A series aligns to the rows when one column is selected and to
    /// the columns otherwise.
    pub fn assign_iloc(
        &self,
        rows: impl Into<IlocKey>,
        cols: impl Into<IlocKey>,
        value: impl Into<AssignValue>,
    ) -> Result<Frame> {
        let rows = rows.into().resolve(self.row_count())?.positions();
        let cols = cols.into().resolve(self.column_count())?.positions();
        let grid = match value.into() {
            AssignValue::Element(value) => AssignGrid::Element(value),
            AssignValue::Grid(grid) => AssignGrid::Rows(grid),
            AssignValue::Values(values) => {
                if cols.len() == 1 {
                    if values.len() != rows.len() {
                        return Err(Error::LengthMismatch {
                            expected: rows.len(),
                            actual: values.len(),
                        });
                    }
                    AssignGrid::Rows(values.into_iter().map(|v| vec![v]).collect())
                } else if rows.len() == 1 {
                    if values.len() != cols.len() {
                        return Err(Error::LengthMismatch {
                            expected: cols.len(),
                            actual: values.len(),
                        });
                    }
                    AssignGrid::Rows(vec![values])
                } else {
                    return Err(Error::Shape(format!(
                        "one-dimensional values cannot fill {} rows by {} columns",
                        rows.len(),
                        cols.len()
                    )));
                }
            }
            AssignValue::Series(series) => {
                let by_row = cols.len() == 1;
                self.aligned_grid(&rows, &cols, |r, c| {
                    let label = if by_row {
                        self.index.label_at(r)
                    } else {
                        self.columns.label_at(c)
                    };
                    label.and_then(|l| series.get(&l))
                })?
            }
            AssignValue::Frame(frame) => self.aligned_grid(&rows, &cols, |r, c| {
                let row = frame.index.position(&self.index.label_at(r)?)?;
                let col = frame.columns.position(&self.columns.label_at(c)?)?;
                frame.blocks.value(row, col).ok()
            })?,
        };
        let blocks = self.blocks.assign(&rows, &cols, &grid)?;
        Ok(Frame::from_parts(blocks, self.index.clone(), self.columns.clone(), self.name.clone()))
    }

    /// Values from `lookup`, falling back to the current cell
    fn aligned_grid<F>(&self, rows: &[usize], cols: &[usize], lookup: F) -> Result<AssignGrid>
    where
        F: Fn(usize, usize) -> Option<Value>,
    {
        let grid = rows
            .iter()
            .map(|&r| {
                cols.iter()
                    .map(|&c| match lookup(r, c) {
                        Some(value) => Ok(value),
                        None => self.blocks.value(r, c),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(AssignGrid::Rows(grid))
    }
}
