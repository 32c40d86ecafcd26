mod axis;
mod hierarchy;
mod level;
mod loc;

pub use axis::AxisIndex;
pub use hierarchy::{GrowableIndexHierarchy, IndexHierarchy};
pub use level::{IndexLevel, LabelTree};
pub use loc::{HLoc, LocKey};

use std::collections::HashMap;
use std::sync::Arc;

use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::value::Label;

/// Single-depth axis labels
///
/// Maps unique labels to dense positions `0..n`. Label storage is shared
/// between copies, so deriving a renamed index does not copy labels.
#[derive(Debug, Clone)]
pub struct Index {
    /// Labels in position order
    labels: Arc<Vec<Label>>,

    /// Label to position
    map: Arc<HashMap<Label, usize>>,

    /// Optional name of the index
    name: Option<Label>,

    /// Auto-generated `0..n` labels
    trivial: bool,
}

impl Index {
    /// Create a new index; duplicate labels are rejected
    pub fn new<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self::with_name(labels, None)
    }

    /// Create a new named index
    pub fn with_name<I, L>(labels: I, name: Option<Label>) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        let mut map = HashMap::with_capacity(labels.len());
        for (i, label) in labels.iter().enumerate() {
            if map.insert(label.clone(), i).is_some() {
                return Err(Error::DuplicateLabel(format!("{}", label)));
            }
        }
        Ok(Index {
            labels: Arc::new(labels),
            map: Arc::new(map),
            name,
            trivial: false,
        })
    }

    /// Index over labels already known to be unique
    pub(crate) fn from_labels_unchecked(labels: Vec<Label>) -> Self {
        let map = labels.iter().cloned().zip(0..labels.len()).collect();
        Index {
            labels: Arc::new(labels),
            map: Arc::new(map),
            name: None,
            trivial: false,
        }
    }

    /// Auto-generated integer labels `0..len`
    pub fn from_range(len: usize) -> Self {
        let labels: Vec<Label> = (0..len).map(Label::from).collect();
        let map = labels.iter().cloned().zip(0..len).collect();
        Index {
            labels: Arc::new(labels),
            map: Arc::new(map),
            name: None,
            trivial: true,
        }
    }

    pub fn empty() -> Self {
        Index::from_range(0)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn name(&self) -> Option<&Label> {
        self.name.as_ref()
    }

    /// Copy with a new name
    pub fn rename(&self, name: Option<Label>) -> Self {
        let mut index = self.clone();
        index.name = name;
        index
    }

    /// True when the labels were generated from the axis length
    pub fn is_trivial(&self) -> bool {
        self.trivial
    }

    pub fn position(&self, label: &Label) -> Option<usize> {
        self.map.get(label).copied()
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.map.contains_key(label)
    }

    pub fn label_at(&self, pos: usize) -> Option<&Label> {
        self.labels.get(pos)
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Same labels in the same order
    pub fn equals(&self, other: &Index) -> bool {
        Arc::ptr_eq(&self.labels, &other.labels) || self.labels == other.labels
    }

    fn require(&self, label: &Label) -> Result<usize> {
        self.position(label)
            .ok_or_else(|| Error::KeyNotFound(format!("{}", label)))
    }

    /// Resolve a label-based key into positions
    pub fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        match key {
            LocKey::All => Ok(IlocKey::Slice(0..self.len())),
            LocKey::Label(label) => Ok(IlocKey::Position(self.require(label)?)),
            LocKey::Slice { start, stop } => {
                let begin = match start {
                    Some(label) => self.require(label)?,
                    None => 0,
                };
                let end = match stop {
                    Some(label) => self.require(label)? + 1,
                    None => self.len(),
                };
                Ok(IlocKey::Slice(begin..end.max(begin)))
            }
            LocKey::List(labels) => Ok(IlocKey::List(
                labels.iter().map(|l| self.require(l)).collect::<Result<_>>()?,
            )),
            LocKey::Mask(mask) => {
                if mask.len() != self.len() {
                    return Err(Error::LengthMismatch {
                        expected: self.len(),
                        actual: mask.len(),
                    });
                }
                Ok(IlocKey::Mask(mask.clone()))
            }
            LocKey::ILoc(key) => Ok(key.clone()),
            LocKey::HLoc(hloc) => match hloc.parts() {
                [single] => self.loc_to_iloc(single),
                _ => Err(Error::KeyNotFound(format!(
                    "a key of depth {} cannot select from a flat index",
                    hloc.len()
                ))),
            },
        }
    }

    /// New index over the selected positions
    pub fn select(&self, key: &IlocKey) -> Result<Index> {
        if key.is_identity(self.len()) {
            return Ok(self.clone());
        }
        let positions = key.resolve(self.len())?.positions();
        Index::with_name(
            positions.iter().map(|p| self.labels[*p].clone()),
            self.name.clone(),
        )
    }

    /// Labels of `self` followed by unseen labels of `other`
    pub fn union(&self, other: &Index) -> Index {
        if self.equals(other) {
            return self.clone();
        }
        let mut labels = self.labels.as_ref().clone();
        labels.extend(other.labels.iter().filter(|l| !self.contains(l)).cloned());
        let name = if self.name == other.name { self.name.clone() } else { None };
        Index::from_labels_unchecked(labels).rename(name)
    }

    /// Labels of `self` also present in `other`
    pub fn intersection(&self, other: &Index) -> Index {
        if self.equals(other) {
            return self.clone();
        }
        let labels: Vec<Label> = self
            .labels
            .iter()
            .filter(|l| other.contains(l))
            .cloned()
            .collect();
        let name = if self.name == other.name { self.name.clone() } else { None };
        Index::from_labels_unchecked(labels).rename(name)
    }

    /// Nest every label under one new outer label
    pub fn add_level(&self, level: impl Into<Label>) -> Result<IndexHierarchy> {
        let level = level.into();
        let labels: Vec<Vec<Label>> = self
            .labels
            .iter()
            .map(|l| vec![level.clone(), l.clone()])
            .collect();
        IndexHierarchy::from_label_rows(labels, 2, None)
    }

    /// Map every label through `f`; the results must stay unique
    pub fn relabel<F>(&self, f: F) -> Result<Index>
    where
        F: Fn(&Label) -> Label,
    {
        Index::with_name(self.labels.iter().map(f), self.name.clone())
    }

    /// Append one label in place, copying shared storage first if needed
    pub(crate) fn push(&mut self, label: Label) -> Result<()> {
        if self.contains(&label) {
            return Err(Error::DuplicateLabel(format!("{}", label)));
        }
        let position = self.labels.len();
        Arc::make_mut(&mut self.map).insert(label.clone(), position);
        Arc::make_mut(&mut self.labels).push(label);
        self.trivial = false;
        Ok(())
    }
}

/// Index that can gain labels at the end
///
/// Existing labels keep their positions; nothing is removed or reordered.
#[derive(Debug, Clone)]
pub struct GrowableIndex {
    index: Index,
}

impl GrowableIndex {
    pub fn new() -> Self {
        GrowableIndex {
            index: Index::empty(),
        }
    }

    pub fn append(&mut self, label: impl Into<Label>) -> Result<()> {
        self.index.push(label.into())
    }

    /// Append several labels; stops at the first duplicate
    pub fn extend<I, L>(&mut self, labels: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        for label in labels {
            self.append(label)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn position(&self, label: &Label) -> Option<usize> {
        self.index.position(label)
    }

    pub fn labels(&self) -> &[Label] {
        self.index.labels()
    }

    /// Immutable copy of the current labels
    pub fn to_index(&self) -> Index {
        self.index.clone()
    }
}

impl Default for GrowableIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Index> for GrowableIndex {
    fn from(index: Index) -> Self {
        GrowableIndex { index }
    }
}

/// Common read interface of axis label containers
pub trait IndexTrait {
    /// Number of positions
    fn len(&self) -> usize;

    /// Whether there are no positions
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of label parts per position
    fn depth(&self) -> usize;

    /// Label at a position; tuples for hierarchies
    fn label_at(&self, pos: usize) -> Option<Label>;

    /// Resolve a label-based key into positions
    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey>;
}

impl IndexTrait for Index {
    fn len(&self) -> usize {
        self.len()
    }

    fn depth(&self) -> usize {
        1
    }

    fn label_at(&self, pos: usize) -> Option<Label> {
        Index::label_at(self, pos).cloned()
    }

    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        Index::loc_to_iloc(self, key)
    }
}

impl IndexTrait for GrowableIndex {
    fn len(&self) -> usize {
        self.index.len()
    }

    fn depth(&self) -> usize {
        1
    }

    fn label_at(&self, pos: usize) -> Option<Label> {
        self.index.label_at(pos).cloned()
    }

    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        self.index.loc_to_iloc(key)
    }
}
