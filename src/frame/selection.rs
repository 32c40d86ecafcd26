use super::Frame;
use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::index::LocKey;
use crate::series::Series;
use crate::type_blocks::Extracted;
use crate::value::{Label, Value};

/// Result of a selection, collapsed by the number of single positions given
#[derive(Debug, Clone)]
pub enum Selection {
    Frame(Frame),
    Series(Series),
    Element(Value),
}

impl Selection {
    fn kind(&self) -> &'static str {
        match self {
            Selection::Frame(_) => "frame",
            Selection::Series(_) => "series",
            Selection::Element(_) => "element",
        }
    }

    pub fn into_frame(self) -> Result<Frame> {
        match self {
            Selection::Frame(frame) => Ok(frame),
            other => Err(Error::Type(format!("expected a frame, got {}", other.kind()))),
        }
    }

    pub fn into_series(self) -> Result<Series> {
        match self {
            Selection::Series(series) => Ok(series),
            other => Err(Error::Type(format!("expected a series, got {}", other.kind()))),
        }
    }

    pub fn into_element(self) -> Result<Value> {
        match self {
            Selection::Element(value) => Ok(value),
            other => Err(Error::Type(format!("expected an element, got {}", other.kind()))),
        }
    }
}

impl Frame {
    /// Select by position on both axes
    ///
    /// A single position on one axis yields a series along the other; single
    /// positions on both yield an element.
    pub fn iloc(&self, rows: impl Into<IlocKey>, cols: impl Into<IlocKey>) -> Result<Selection> {
        let rows = rows.into();
        let cols = cols.into();
        match self.blocks.extract(&rows, &cols)? {
            Extracted::Element(value) => Ok(Selection::Element(value)),
            Extracted::Array(values) => match (&rows, &cols) {
                (_, IlocKey::Position(c)) => Ok(Selection::Series(Series::from_parts(
                    values,
                    self.index.select(&rows)?,
                    self.columns.label_at(*c),
                ))),
                (IlocKey::Position(r), _) => Ok(Selection::Series(Series::from_parts(
                    values,
                    self.columns.select(&cols)?,
                    self.index.label_at(*r),
                ))),
                _ => Err(Error::InvalidOperation(
                    "an axis collapsed without a single position".into(),
                )),
            },
            Extracted::Blocks(blocks) => Ok(Selection::Frame(Frame::from_parts(
                blocks,
                self.index.select(&rows)?,
                self.columns.select(&cols)?,
                self.name.clone(),
            ))),
        }
    }

    /// Select by label on both axes, collapsing like [`Frame::iloc`]
    pub fn loc(&self, rows: impl Into<LocKey>, cols: impl Into<LocKey>) -> Result<Selection> {
        let rows = self.index.loc_to_iloc(&rows.into())?;
        let cols = self.columns.loc_to_iloc(&cols.into())?;
        self.iloc(rows, cols)
    }

    /// Rows selected by label, every column kept
    pub fn loc_rows(&self, rows: impl Into<LocKey>) -> Result<Selection> {
        self.loc(rows, LocKey::All)
    }

    /// The column named `label`; its blocks are shared
    pub fn column(&self, label: impl Into<Label>) -> Result<Series> {
        let label = label.into();
        self.get(&label)
            .ok_or_else(|| Error::KeyNotFound(format!("{}", label)))
    }

    /// The column named `label`, if present
    pub fn get(&self, label: &Label) -> Option<Series> {
        let position = self.columns.position(label)?;
        Some(self.column_series(position))
    }
}
