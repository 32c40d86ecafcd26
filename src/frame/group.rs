use std::collections::HashMap;

use super::Frame;
use crate::error::{Error, Result};
use crate::value::{Label, Value, ValueKey};

/// Positions of each distinct value, keyed in first-seen order
pub(crate) fn group_positions(values: Vec<Value>) -> Vec<(Value, Vec<usize>)> {
    let mut slots: HashMap<ValueKey, usize> = HashMap::new();
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
    for (position, value) in values.into_iter().enumerate() {
        let key = ValueKey(value);
        match slots.get(&key) {
            Some(&slot) => groups[slot].1.push(position),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key.0, vec![position]));
            }
        }
    }
    groups
}

impl Frame {
    /// Sub-frames sharing one value in column `key` (axis 0) or row `key`
    /// (axis 1)
    pub fn iter_group(&self, key: impl Into<Label>, axis: usize) -> Result<Vec<Frame>> {
        Ok(self
            .iter_group_items(key, axis)?
            .into_iter()
            .map(|(_, frame)| frame)
            .collect())
    }

    /// Group value and sub-frame pairs, in first-seen order of the values
    pub fn iter_group_items(&self, key: impl Into<Label>, axis: usize) -> Result<Vec<(Value, Frame)>> {
        let key = key.into();
        let labels = if axis == 0 { &self.columns } else { &self.index };
        let position = labels
            .position(&key)
            .ok_or_else(|| Error::KeyNotFound(format!("{}", key)))?;
        self.iter_group_iloc_items(position, axis)
    }

    /// Sub-frames grouped by the column (axis 0) or row (axis 1) at `position`
    pub fn iter_group_iloc(&self, position: usize, axis: usize) -> Result<Vec<Frame>> {
        Ok(self
            .iter_group_iloc_items(position, axis)?
            .into_iter()
            .map(|(_, frame)| frame)
            .collect())
    }

    /// Group value and sub-frame pairs for the column or row at `position`
    pub fn iter_group_iloc_items(&self, position: usize, axis: usize) -> Result<Vec<(Value, Frame)>> {
        let values = match axis {
            0 => self.blocks.column(position)?.column_values(0),
            1 => self.blocks.row(position)?,
            other => {
                return Err(Error::InvalidOperation(format!("axis {} does not exist", other)))
            }
        };
        group_positions(values)
            .into_iter()
            .map(|(value, positions)| {
                let frame = if axis == 0 {
                    self.take_rows(positions)?
                } else {
                    self.take_columns(positions)?
                };
                Ok((value, frame))
            })
            .collect()
    }
}
