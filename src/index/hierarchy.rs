use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{AxisIndex, HLoc, Index, IndexLevel, IndexTrait, LabelTree, LocKey};
use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::value::Label;

/// Hierarchical axis labels backed by an [`IndexLevel`] tree
///
/// Positions are addressed by tuple labels with one part per depth.
#[derive(Debug, Clone)]
pub struct IndexHierarchy {
    levels: Arc<IndexLevel>,
    /// Label rows in position order
    labels: Arc<Vec<Vec<Label>>>,
    name: Option<Label>,
}

/// Reorder rows so that equal prefixes are contiguous, keeping first-seen order
fn group_rows(rows: Vec<Vec<Label>>, d: usize) -> Vec<Vec<Label>> {
    let depth = rows.first().map(Vec::len).unwrap_or(0);
    if d + 1 >= depth {
        return rows;
    }
    let mut order: Vec<Label> = Vec::new();
    let mut groups: HashMap<Label, Vec<Vec<Label>>> = HashMap::new();
    for row in rows {
        let key = row[d].clone();
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(row);
    }
    order
        .into_iter()
        .flat_map(|key| group_rows(groups.remove(&key).unwrap_or_default(), d + 1))
        .collect()
}

impl IndexHierarchy {
    fn from_level(levels: IndexLevel, name: Option<Label>) -> Self {
        let labels = levels.labels();
        IndexHierarchy {
            levels: Arc::new(levels),
            labels: Arc::new(labels),
            name,
        }
    }

    /// Build from tuple labels grouped by prefix
    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let rows: Vec<Vec<Label>> = labels
            .into_iter()
            .map(|l| l.into().parts().to_vec())
            .collect();
        let depth = rows.first().map(Vec::len).unwrap_or(2);
        Self::from_label_rows(rows, depth, None)
    }

    pub(crate) fn from_label_rows(rows: Vec<Vec<Label>>, depth: usize, name: Option<Label>) -> Result<Self> {
        let levels = IndexLevel::from_labels(&rows, depth)?;
        Ok(IndexHierarchy {
            levels: Arc::new(levels),
            labels: Arc::new(rows),
            name,
        })
    }

    /// Build from explicitly nested labels
    pub fn from_tree(tree: &LabelTree) -> Result<Self> {
        Ok(Self::from_level(IndexLevel::from_tree(tree)?, None))
    }

    /// Build the Cartesian product of per-depth labels
    pub fn from_product<I, L>(levels: Vec<I>) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let levels: Vec<Vec<Label>> = levels
            .into_iter()
            .map(|level| level.into_iter().map(Into::into).collect())
            .collect();
        Ok(Self::from_level(IndexLevel::from_product(&levels)?, None))
    }

    /// A hierarchy of the given depth with no positions
    pub fn empty(depth: usize) -> Self {
        Self::from_level(IndexLevel::empty(depth), None)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.levels.depth()
    }

    pub fn name(&self) -> Option<&Label> {
        self.name.as_ref()
    }

    pub fn rename(&self, name: Option<Label>) -> Self {
        let mut index = self.clone();
        index.name = name;
        index
    }

    /// The underlying depth tree
    pub fn levels(&self) -> &IndexLevel {
        &self.levels
    }

    /// Label rows in position order
    pub fn label_rows(&self) -> &[Vec<Label>] {
        &self.labels
    }

    /// Tuple labels in position order
    pub fn labels(&self) -> Vec<Label> {
        self.labels.iter().map(|row| Label::Tuple(row.clone())).collect()
    }

    pub fn label_at(&self, pos: usize) -> Option<Label> {
        self.labels.get(pos).map(|row| Label::Tuple(row.clone()))
    }

    /// Position of a full-depth label
    pub fn position(&self, label: &Label) -> Option<usize> {
        let parts = label.parts();
        if parts.len() != self.depth() {
            return None;
        }
        match self.levels.loc_to_iloc(&HLoc::from_labels(parts)) {
            Ok(IlocKey::Position(p)) => Some(p),
            _ => None,
        }
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.position(label).is_some()
    }

    /// Same label rows in the same order
    pub fn equals(&self, other: &IndexHierarchy) -> bool {
        Arc::ptr_eq(&self.labels, &other.labels) || self.labels == other.labels
    }

    /// Every position covered by `label`, as a run
    fn label_span(&self, label: &Label) -> Result<(usize, usize)> {
        match self.levels.loc_to_iloc(&HLoc::from_labels(label.parts()))? {
            IlocKey::Position(p) => Ok((p, p + 1)),
            IlocKey::Slice(range) => Ok((range.start, range.end)),
            _ => Err(Error::KeyNotFound(format!("{}", label))),
        }
    }

    /// Resolve a label-based key into positions
    ///
    /// Tuple labels address every depth; other labels address the outermost
    /// depth. Slices run from the first position of `start` through the last
    /// position of `stop`.
    pub fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        match key {
            LocKey::All => Ok(IlocKey::Slice(0..self.len())),
            LocKey::HLoc(hloc) => self.levels.loc_to_iloc(hloc),
            LocKey::Label(label) => self.levels.loc_to_iloc(&HLoc::from_labels(label.parts())),
            LocKey::Slice { start, stop } => {
                let begin = match start {
                    Some(label) => self.label_span(label)?.0,
                    None => 0,
                };
                let end = match stop {
                    Some(label) => self.label_span(label)?.1,
                    None => self.len(),
                };
                Ok(IlocKey::Slice(begin..end.max(begin)))
            }
            LocKey::List(labels) => {
                let mut positions = Vec::with_capacity(labels.len());
                for label in labels {
                    let (begin, end) = self.label_span(label)?;
                    positions.extend(begin..end);
                }
                Ok(IlocKey::List(positions))
            }
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
        }
    }

    /// New hierarchy over the selected positions
    pub fn select(&self, key: &IlocKey) -> Result<IndexHierarchy> {
        if key.is_identity(self.len()) {
            return Ok(self.clone());
        }
        let rows = key
            .resolve(self.len())?
            .positions()
            .into_iter()
            .map(|p| self.labels[p].clone())
            .collect();
        Self::from_label_rows(rows, self.depth(), self.name.clone())
    }

    fn check_depth(&self, other: &IndexHierarchy) -> Result<()> {
        if self.depth() != other.depth() {
            return Err(Error::MalformedHierarchy(format!(
                "hierarchies of depth {} and {} cannot combine",
                self.depth(),
                other.depth()
            )));
        }
        Ok(())
    }

    /// Rows of `self` followed by unseen rows of `other`, regrouped by prefix
    pub fn union(&self, other: &IndexHierarchy) -> Result<IndexHierarchy> {
        self.check_depth(other)?;
        if self.equals(other) {
            return Ok(self.clone());
        }
        let seen: HashSet<&Vec<Label>> = self.labels.iter().collect();
        let mut rows = self.labels.as_ref().clone();
        rows.extend(other.labels.iter().filter(|r| !seen.contains(r)).cloned());
        let name = if self.name == other.name { self.name.clone() } else { None };
        Self::from_label_rows(group_rows(rows, 0), self.depth(), name)
    }

    /// Rows of `self` also present in `other`
    pub fn intersection(&self, other: &IndexHierarchy) -> Result<IndexHierarchy> {
        self.check_depth(other)?;
        if self.equals(other) {
            return Ok(self.clone());
        }
        let keep: HashSet<&Vec<Label>> = other.labels.iter().collect();
        let rows = self
            .labels
            .iter()
            .filter(|r| keep.contains(r))
            .cloned()
            .collect();
        let name = if self.name == other.name { self.name.clone() } else { None };
        Self::from_label_rows(rows, self.depth(), name)
    }

    /// Nest every position under one new outermost label
    pub fn add_level(&self, level: impl Into<Label>) -> Result<IndexHierarchy> {
        let level = level.into();
        let tree = self.levels.add_level(level.clone())?;
        let rows = self
            .labels
            .iter()
            .map(|row| {
                let mut out = Vec::with_capacity(row.len() + 1);
                out.push(level.clone());
                out.extend(row.iter().cloned());
                out
            })
            .collect();
        Ok(IndexHierarchy {
            levels: Arc::new(tree),
            labels: Arc::new(rows),
            name: self.name.clone(),
        })
    }

    /// Remove depths: a positive count drops outer depths, a negative count
    /// inner ones
    ///
    /// Reaching depth one yields a flat [`Index`]. The remaining labels must
    /// still be unique.
    pub fn drop_level(&self, count: isize) -> Result<AxisIndex> {
        if count == 0 {
            return Ok(AxisIndex::Hierarchy(self.clone()));
        }
        let n = count.unsigned_abs();
        let depth = self.depth();
        if n >= depth {
            return Err(Error::InvalidOperation(format!(
                "cannot drop {} levels from a hierarchy of depth {}",
                n, depth
            )));
        }
        let rows: Vec<Vec<Label>> = self
            .labels
            .iter()
            .map(|row| {
                if count > 0 {
                    row[n..].to_vec()
                } else {
                    row[..depth - n].to_vec()
                }
            })
            .collect();
        if depth - n == 1 {
            let index = Index::new(rows.into_iter().flatten())?;
            return Ok(AxisIndex::Simple(index));
        }
        // Remaining labels repeated across former branches cannot be regrouped
        match Self::from_label_rows(rows, depth - n, None) {
            Ok(hierarchy) => Ok(AxisIndex::Hierarchy(hierarchy)),
            Err(Error::MalformedHierarchy(msg)) => Err(Error::DuplicateLabel(msg)),
            Err(e) => Err(e),
        }
    }

    /// Label of every position at one depth
    pub fn level_labels(&self, depth: usize) -> Result<Vec<Label>> {
        if depth >= self.depth() {
            return Err(Error::IndexOutOfBounds {
                index: depth,
                size: self.depth(),
            });
        }
        Ok(self.labels.iter().map(|row| row[depth].clone()).collect())
    }

    /// Flat index of tuple labels
    pub fn flat(&self) -> Result<Index> {
        Index::with_name(self.labels(), self.name.clone())
    }
}

impl IndexTrait for IndexHierarchy {
    fn len(&self) -> usize {
        self.len()
    }

    fn depth(&self) -> usize {
        self.depth()
    }

    fn label_at(&self, pos: usize) -> Option<Label> {
        IndexHierarchy::label_at(self, pos)
    }

    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        IndexHierarchy::loc_to_iloc(self, key)
    }
}

/// Hierarchy that can gain label rows at the end
#[derive(Debug, Clone)]
pub struct GrowableIndexHierarchy {
    levels: IndexLevel,
    labels: Vec<Vec<Label>>,
    name: Option<Label>,
}

impl GrowableIndexHierarchy {
    pub fn new(depth: usize) -> Self {
        GrowableIndexHierarchy {
            levels: IndexLevel::empty(depth),
            labels: Vec::new(),
            name: None,
        }
    }

    /// Append one full-depth label
    pub fn append(&mut self, label: impl Into<Label>) -> Result<()> {
        let row = label.into().parts().to_vec();
        self.levels.append(&row)?;
        self.labels.push(row);
        Ok(())
    }

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
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.levels.depth()
    }

    pub fn position(&self, label: &Label) -> Option<usize> {
        match self.levels.loc_to_iloc(&HLoc::from_labels(label.parts())) {
            Ok(IlocKey::Position(p)) if label.parts().len() == self.depth() => Some(p),
            _ => None,
        }
    }

    /// Immutable copy of the current labels
    pub fn to_hierarchy(&self) -> IndexHierarchy {
        IndexHierarchy {
            levels: Arc::new(self.levels.clone()),
            labels: Arc::new(self.labels.clone()),
            name: self.name.clone(),
        }
    }
}

impl From<IndexHierarchy> for GrowableIndexHierarchy {
    fn from(index: IndexHierarchy) -> Self {
        GrowableIndexHierarchy {
            levels: index.levels.as_ref().clone(),
            labels: index.labels.as_ref().clone(),
            name: index.name,
        }
    }
}

impl IndexTrait for GrowableIndexHierarchy {
    fn len(&self) -> usize {
        self.labels.len()
    }

    fn depth(&self) -> usize {
        self.levels.depth()
    }

    fn label_at(&self, pos: usize) -> Option<Label> {
        self.labels.get(pos).map(|row| Label::Tuple(row.clone()))
    }

    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        self.to_hierarchy().loc_to_iloc(key)
    }
}
