//! One-dimensional labelled values
//!
//! A [`Series`] pairs a single one-dimensional [`Block`] with an
//! [`AxisIndex`]. Like every container in this crate it is immutable: each
//! operation returns a new series, sharing the value buffer where it can.

mod ops;

use crate::block::{Block, DType, IlocKey, Resolved};
use crate::error::{Error, Result};
use crate::frame::{group_positions, AssignValue, Selection};
use crate::index::{AxisIndex, Index, LocKey};
use crate::type_blocks::{AssignGrid, TypedBlockSet};
use crate::value::{Label, Value};

/// Labelled one-dimensional values of a single element type
#[derive(Debug, Clone)]
pub struct Series {
    /// One-dimensional values
    values: Block,

    /// Labels, one per value
    index: AxisIndex,

    /// Optional name of the series
    name: Option<Label>,
}

impl Series {
    /// Create a series from a block of one column
    ///
    /// Without an index the labels are `0..len`.
    pub fn new(values: Block, index: Option<AxisIndex>, name: Option<Label>) -> Result<Self> {
        if values.cols() != 1 {
            return Err(Error::Shape(format!(
                "a series holds one column, got {}",
                values.cols()
            )));
        }
        let values = values.column(0);
        let index = match index {
            Some(index) if index.len() != values.rows() => {
                return Err(Error::LengthMismatch {
                    expected: values.rows(),
                    actual: index.len(),
                })
            }
            Some(index) => index,
            None => AxisIndex::range(values.rows()),
        };
        Ok(Series {
            values,
            index,
            name,
        })
    }

    pub(crate) fn from_parts(values: Block, index: AxisIndex, name: Option<Label>) -> Self {
        Series {
            values,
            index,
            name,
        }
    }

    /// Values with an inferred element type and `0..len` labels
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = Block::from_values(values.into_iter().map(Into::into).collect());
        let index = AxisIndex::range(values.rows());
        Series::from_parts(values, index, None)
    }

    /// Label and value pairs; labels must be unique
    pub fn from_items<I, L, V>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (L, V)>,
        L: Into<Label>,
        V: Into<Value>,
    {
        let (labels, values): (Vec<Label>, Vec<Value>) = items
            .into_iter()
            .map(|(l, v)| (l.into(), v.into()))
            .unzip();
        let index = AxisIndex::Simple(Index::new(labels)?);
        Ok(Series::from_parts(Block::from_values(values), index, None))
    }

    /// One value repeated for every label of `index`
    pub fn from_element(value: impl Into<Value>, index: AxisIndex) -> Result<Self> {
        let values = Block::full(&value.into(), index.len())?;
        Ok(Series::from_parts(values, index, None))
    }

    /// Same values under new labels of equal length
    pub fn with_index(self, index: impl Into<AxisIndex>) -> Result<Self> {
        let name = self.name.clone();
        Series::new(self.values, Some(index.into()), name)
    }

    pub fn with_name(mut self, name: impl Into<Label>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn len(&self) -> usize {
        self.values.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        self.values.dtype()
    }

    pub fn values(&self) -> &Block {
        &self.values
    }

    /// Values in position order
    pub fn to_values(&self) -> Vec<Value> {
        self.values.column_values(0)
    }

    pub fn index(&self) -> &AxisIndex {
        &self.index
    }

    pub fn name(&self) -> Option<&Label> {
        self.name.as_ref()
    }

    /// Copy with a new name; values are shared
    pub fn rename(&self, name: Option<Label>) -> Self {
        let mut series = self.clone();
        series.name = name;
        series
    }

    /// Value at a label
    pub fn get(&self, label: &Label) -> Option<Value> {
        let pos = self.index.position(label)?;
        self.values.get(pos, 0)
    }

    /// Label and value pairs in position order
    pub fn items(&self) -> impl Iterator<Item = (Label, Value)> + '_ {
        (0..self.len()).filter_map(move |p| Some((self.index.label_at(p)?, self.values.get(p, 0)?)))
    }

    pub fn to_pairs(&self) -> Vec<(Label, Value)> {
        self.items().collect()
    }

    /// Select by position; a single position yields an element
    pub fn iloc(&self, key: impl Into<IlocKey>) -> Result<Selection> {
        let key = key.into();
        match key.resolve(self.len())? {
            Resolved::Single(p) => Ok(Selection::Element(self.values.value(p, 0))),
            Resolved::Many(positions) => Ok(Selection::Series(self.take(&key, &positions)?)),
        }
    }

    /// Select by label; a single label yields an element
    pub fn loc(&self, key: impl Into<LocKey>) -> Result<Selection> {
        let key = self.index.loc_to_iloc(&key.into())?;
        self.iloc(key)
    }

    fn take(&self, key: &IlocKey, positions: &[usize]) -> Result<Series> {
        let values = if key.is_identity(self.len()) {
            self.values.clone()
        } else {
            self.values.take_rows(positions)
        };
        Ok(Series::from_parts(values, self.index.select(key)?, self.name.clone()))
    }

    /// Series of the positions selected by `key`, never collapsed
    pub(crate) fn take_iloc(&self, key: &IlocKey) -> Result<Series> {
        let positions = key.resolve(self.len())?.positions();
        let key = match key {
            IlocKey::Position(_) => IlocKey::List(positions.clone()),
            other => other.clone(),
        };
        self.take(&key, &positions)
    }

    /// First `n` values
    pub fn head(&self, n: usize) -> Result<Series> {
        self.take_iloc(&IlocKey::Slice(0..n.min(self.len())))
    }

    /// Last `n` values
    pub fn tail(&self, n: usize) -> Result<Series> {
        let start = self.len().saturating_sub(n);
        self.take_iloc(&IlocKey::Slice(start..self.len()))
    }

    /// Conform to `index`
    ///
    /// Labels missing from this series receive `fill_value`, or the missing
    /// sentinel of the value type when no fill is given.
    pub fn reindex(&self, index: impl Into<AxisIndex>, fill_value: Option<&Value>) -> Result<Series> {
        let index = index.into();
        if index.equals(&self.index) {
            return Ok(Series::from_parts(self.values.clone(), index, self.name.clone()));
        }
        let positions: Vec<Option<usize>> = index
            .labels()
            .iter()
            .map(|label| self.index.position(label))
            .collect();
        log::debug!("reindexing series of {} to {} labels", self.len(), index.len());
        let values = self.values.take_rows_filled(&positions, fill_value)?;
        Ok(Series::from_parts(values, index, self.name.clone()))
    }

    /// Nest every label under a new outermost label
    pub fn add_level(&self, level: impl Into<Label>) -> Result<Series> {
        Ok(Series::from_parts(
            self.values.clone(),
            self.index.add_level(level)?,
            self.name.clone(),
        ))
    }

    /// Remove outer (positive) or inner (negative) label depths
    pub fn drop_level(&self, count: isize) -> Result<Series> {
        Ok(Series::from_parts(
            self.values.clone(),
            self.index.drop_level(count)?,
            self.name.clone(),
        ))
    }

    /// Boolean series marking missing values
    pub fn isna(&self) -> Series {
        Series::from_parts(self.values.isna(), self.index.clone(), self.name.clone())
    }

    pub fn fillna(&self, fill: impl Into<Value>) -> Result<Series> {
        Ok(Series::from_parts(
            self.values.fillna(&fill.into())?,
            self.index.clone(),
            self.name.clone(),
        ))
    }

    /// Apply `f` to every value, inferring the result type
    pub fn apply<F>(&self, f: F) -> Result<Series>
    where
        F: Fn(&Value) -> Result<Value>,
    {
        let values = self
            .to_values()
            .iter()
            .map(f)
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::from_parts(
            Block::from_values(values),
            self.index.clone(),
            self.name.clone(),
        ))
    }

    /// Sub-series per distinct value, in first-seen order
    pub fn iter_group(&self) -> Result<Vec<Series>> {
        Ok(self
            .iter_group_items()?
            .into_iter()
            .map(|(_, group)| group)
            .collect())
    }

    /// Distinct value and its sub-series, in first-seen order
    pub fn iter_group_items(&self) -> Result<Vec<(Value, Series)>> {
        group_positions(self.to_values())
            .into_iter()
            .map(|(key, positions)| Ok((key, self.take_iloc(&IlocKey::List(positions))?)))
            .collect()
    }

    /// Copy with the labels selected by `key` set to `value`
    pub fn assign(&self, key: impl Into<LocKey>, value: impl Into<AssignValue>) -> Result<Series> {
        let key = self.index.loc_to_iloc(&key.into())?;
        self.assign_iloc(key, value)
    }

    /// Copy with the positions selected by `key` set to `value`
    ///
    /// A series value is aligned by label; positions whose label it lacks keep
    /// their current value.
    pub fn assign_iloc(&self, key: impl Into<IlocKey>, value: impl Into<AssignValue>) -> Result<Series> {
        let positions = key.into().resolve(self.len())?.positions();
        let grid = match value.into() {
            AssignValue::Element(v) => AssignGrid::Element(v),
            AssignValue::Values(values) => {
                if values.len() != positions.len() {
                    return Err(Error::LengthMismatch {
                        expected: positions.len(),
                        actual: values.len(),
                    });
                }
                AssignGrid::Rows(values.into_iter().map(|v| vec![v]).collect())
            }
            AssignValue::Series(other) => AssignGrid::Rows(
                positions
                    .iter()
                    .map(|&p| {
                        let label = self.index.label_at(p);
                        let value = label
                            .and_then(|l| other.get(&l))
                            .unwrap_or_else(|| self.values.value(p, 0));
                        vec![value]
                    })
                    .collect(),
            ),
            AssignValue::Grid(_) | AssignValue::Frame(_) => {
                return Err(Error::InvalidOperation(
                    "a series cannot be assigned two-dimensional values".into(),
                ))
            }
        };
        let set = TypedBlockSet::from_columns(vec![self.values.clone()], self.len())?;
        let values = set.assign(&positions, &[0], &grid)?.column(0)?;
        Ok(Series::from_parts(values, self.index.clone(), self.name.clone()))
    }

    /// Join several series end to end
    ///
    /// Values take the resolved type of all inputs. Without an explicit index
    /// the input labels are concatenated and must stay unique.
    pub fn from_concat(series: &[Series], index: Option<AxisIndex>, name: Option<Label>) -> Result<Series> {
        let dtype = DType::resolve_all(series.iter().map(Series::dtype)).unwrap_or(DType::Float64);
        let parts = series
            .iter()
            .map(|s| s.values.astype(dtype))
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&Block> = parts.iter().collect();
        let values = if refs.is_empty() {
            Block::from_values_as(Vec::new(), dtype)?
        } else {
            Block::vstack(&refs)?
        };
        log::debug!("concatenated {} series into {} values", series.len(), values.rows());
        let index = match index {
            Some(index) => index,
            None => {
                let indices: Vec<&AxisIndex> = series.iter().map(Series::index).collect();
                AxisIndex::concat(&indices)?
            }
        };
        Series::new(values, Some(index), name)
    }
}
