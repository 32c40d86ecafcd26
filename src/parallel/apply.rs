use super::{map_ordered, ParallelConfig};
use crate::block::Block;
use crate::error::Result;
use crate::frame::Frame;
use crate::series::Series;
use crate::type_blocks::TypedBlockSet;
use crate::value::Value;

impl Series {
    /// [`Series::apply`] on a worker pool
    pub fn par_apply<F>(&self, f: F, config: &ParallelConfig) -> Result<Series>
    where
        F: Fn(&Value) -> Result<Value> + Sync,
    {
        let values = map_ordered(self.to_values(), f, config)?;
        Ok(Series::from_parts(
            Block::from_values(values),
            self.index().clone(),
            self.name().cloned(),
        ))
    }
}

impl Frame {
    /// [`Frame::apply_elements`] on a worker pool
    pub fn par_apply_elements<F>(&self, f: F, config: &ParallelConfig) -> Result<Frame>
    where
        F: Fn(&Value) -> Result<Value> + Sync,
    {
        let rows = self.row_count();
        let values: Vec<Value> = self
            .blocks()
            .iter_columns()
            .flat_map(|column| column.column_values(0))
            .collect();
        let mut results = map_ordered(values, f, config)?.into_iter();
        let columns = (0..self.column_count())
            .map(|_| Block::from_values(results.by_ref().take(rows).collect()))
            .collect();
        let blocks = TypedBlockSet::from_columns(columns, rows)?;
        Frame::from_blocks(blocks, Some(self.index().clone()), Some(self.columns().clone()))
            .map(|frame| frame.rename(self.name().cloned()))
    }

    /// [`Frame::apply_rows`] on a worker pool
    pub fn par_apply_rows<F>(&self, f: F, config: &ParallelConfig) -> Result<Series>
    where
        F: Fn(&[Value]) -> Result<Value> + Sync,
    {
        let rows: Vec<Vec<Value>> = self.blocks().iter_rows().collect();
        let values = map_ordered(rows, |row: &Vec<Value>| f(row), config)?;
        Ok(Series::from_parts(
            Block::from_values(values),
            self.index().clone(),
            None,
        ))
    }

    /// [`Frame::apply_columns`] on a worker pool
    pub fn par_apply_columns<F>(&self, f: F, config: &ParallelConfig) -> Result<Series>
    where
        F: Fn(&[Value]) -> Result<Value> + Sync,
    {
        let columns: Vec<Vec<Value>> = self
            .blocks()
            .iter_columns()
            .map(|column| column.column_values(0))
            .collect();
        let values = map_ordered(columns, |column: &Vec<Value>| f(column), config)?;
        Ok(Series::from_parts(
            Block::from_values(values),
            self.columns().clone(),
            None,
        ))
    }
}
