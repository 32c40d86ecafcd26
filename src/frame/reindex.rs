use std::collections::HashSet;

use super::Frame;
use crate::error::{Error, Result};
use crate::index::{AxisIndex, Index, IndexHierarchy};
use crate::value::{Label, Value};

fn positions_of(source: &AxisIndex, target: &AxisIndex) -> Vec<Option<usize>> {
    target
        .labels()
        .iter()
        .map(|label| source.position(label))
        .collect()
}

impl Frame {
    /// Conform to new row and/or column labels
    ///
    /// Labels kept from the source carry their data; new labels receive
    /// `fill_value`, or the missing sentinel of each column type when no fill
    /// is given. An unchanged axis keeps the existing blocks.
    pub fn reindex(
        &self,
        index: Option<AxisIndex>,
        columns: Option<AxisIndex>,
        fill_value: Option<&Value>,
    ) -> Result<Frame> {
        let mut blocks = self.blocks.clone();
        let mut new_index = self.index.clone();
        let mut new_columns = self.columns.clone();
        if let Some(index) = index {
            if !index.equals(&self.index) {
                blocks = blocks.take_rows_filled(&positions_of(&self.index, &index), fill_value)?;
            }
            new_index = index;
        }
        if let Some(columns) = columns {
            if !columns.equals(&self.columns) {
                blocks = blocks.take_columns_filled(&positions_of(&self.columns, &columns), fill_value)?;
            }
            new_columns = columns;
        }
        Ok(Frame::from_parts(blocks, new_index, new_columns, self.name.clone()))
    }

    /// Nest row and/or column labels under a new outermost label
    pub fn reindex_add_level(&self, index: Option<Label>, columns: Option<Label>) -> Result<Frame> {
        let new_index = match index {
            Some(level) => self.index.add_level(level)?,
            None => self.index.clone(),
        };
        let new_columns = match columns {
            Some(level) => self.columns.add_level(level)?,
            None => self.columns.clone(),
        };
        Ok(Frame::from_parts(self.blocks.clone(), new_index, new_columns, self.name.clone()))
    }

    /// Remove label depths; positive counts drop outer depths, negative inner
    pub fn reindex_drop_level(&self, index: isize, columns: isize) -> Result<Frame> {
        Ok(Frame::from_parts(
            self.blocks.clone(),
            self.index.drop_level(index)?,
            self.columns.drop_level(columns)?,
            self.name.clone(),
        ))
    }

    fn column_position(&self, label: &Label) -> Result<usize> {
        self.columns
            .position(label)
            .ok_or_else(|| Error::KeyNotFound(format!("{}", label)))
    }

    fn without_columns(&self, drop: &HashSet<usize>) -> Result<Frame> {
        self.take_columns((0..self.column_count()).filter(|c| !drop.contains(c)).collect())
    }

    /// Use the values of one column as row labels
    pub fn set_index(&self, column: impl Into<Label>, drop: bool) -> Result<Frame> {
        let column = column.into();
        let position = self.column_position(&column)?;
        let labels = self
            .blocks
            .column(position)?
            .column_values(0)
            .iter()
            .map(Value::to_label)
            .collect::<Result<Vec<_>>>()?;
        let index = AxisIndex::Simple(Index::with_name(labels, Some(column))?);
        let source = if drop {
            self.without_columns(&HashSet::from([position]))?
        } else {
            self.clone()
        };
        Ok(Frame::from_parts(source.blocks, index, source.columns, self.name.clone()))
    }

    /// Use the values of several columns as hierarchical row labels
    ///
    /// Rows must already be grouped by each leading label.
    pub fn set_index_hierarchy(&self, columns: &[Label], drop: bool) -> Result<Frame> {
        if columns.len() < 2 {
            return Err(Error::InvalidOperation(
                "a hierarchy needs at least two columns".into(),
            ));
        }
        let positions = columns
            .iter()
            .map(|c| self.column_position(c))
            .collect::<Result<Vec<_>>>()?;
        let mut rows: Vec<Vec<Label>> = vec![Vec::with_capacity(columns.len()); self.row_count()];
        for &p in &positions {
            let column = self.blocks.column(p)?;
            for (row, value) in rows.iter_mut().zip(column.column_values(0)) {
                row.push(value.to_label()?);
            }
        }
        let index = AxisIndex::Hierarchy(IndexHierarchy::from_label_rows(rows, columns.len(), None)?);
        let source = if drop {
            self.without_columns(&positions.into_iter().collect())?
        } else {
            self.clone()
        };
        Ok(Frame::from_parts(source.blocks, index, source.columns, self.name.clone()))
    }
}
