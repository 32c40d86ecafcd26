use super::{Index, IndexHierarchy, IndexTrait, LocKey};
use crate::block::IlocKey;
use crate::error::{Error, Result};
use crate::value::Label;

/// Labels of one container axis: flat or hierarchical
#[derive(Debug, Clone)]
pub enum AxisIndex {
    Simple(Index),
    Hierarchy(IndexHierarchy),
}

impl AxisIndex {
    /// Auto-generated `0..len` labels
    pub fn range(len: usize) -> Self {
        AxisIndex::Simple(Index::from_range(len))
    }

    /// Flat index over unique labels
    pub fn from_labels<I, L>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Ok(AxisIndex::Simple(Index::new(labels)?))
    }

    /// Hierarchy when every label is a tuple of one common depth and the
    /// tuples group by prefix, flat index otherwise
    pub fn infer(labels: Vec<Label>) -> Result<Self> {
        let depth = labels.first().map(|l| l.parts().len()).unwrap_or(1);
        let nested = depth > 1
            && labels
                .iter()
                .all(|l| l.is_tuple() && l.parts().len() == depth);
        if nested {
            let rows = labels.iter().map(|l| l.parts().to_vec()).collect();
            match IndexHierarchy::from_label_rows(rows, depth, None) {
                Ok(hierarchy) => return Ok(AxisIndex::Hierarchy(hierarchy)),
                Err(Error::MalformedHierarchy(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(AxisIndex::Simple(Index::new(labels)?))
    }

    pub fn len(&self) -> usize {
        match self {
            AxisIndex::Simple(index) => index.len(),
            AxisIndex::Hierarchy(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn depth(&self) -> usize {
        match self {
            AxisIndex::Simple(_) => 1,
            AxisIndex::Hierarchy(index) => index.depth(),
        }
    }

    pub fn name(&self) -> Option<&Label> {
        match self {
            AxisIndex::Simple(index) => index.name(),
            AxisIndex::Hierarchy(index) => index.name(),
        }
    }

    pub fn rename(&self, name: Option<Label>) -> Self {
        match self {
            AxisIndex::Simple(index) => AxisIndex::Simple(index.rename(name)),
            AxisIndex::Hierarchy(index) => AxisIndex::Hierarchy(index.rename(name)),
        }
    }

    /// True for generated `0..n` labels
    pub fn is_trivial(&self) -> bool {
        matches!(self, AxisIndex::Simple(index) if index.is_trivial())
    }

    pub fn label_at(&self, pos: usize) -> Option<Label> {
        match self {
            AxisIndex::Simple(index) => index.label_at(pos).cloned(),
            AxisIndex::Hierarchy(index) => index.label_at(pos),
        }
    }

    /// Labels in position order; tuples for hierarchies
    pub fn labels(&self) -> Vec<Label> {
        match self {
            AxisIndex::Simple(index) => index.labels().to_vec(),
            AxisIndex::Hierarchy(index) => index.labels(),
        }
    }

    pub fn position(&self, label: &Label) -> Option<usize> {
        match self {
            AxisIndex::Simple(index) => index.position(label),
            AxisIndex::Hierarchy(index) => index.position(label),
        }
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.position(label).is_some()
    }

    pub fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        match self {
            AxisIndex::Simple(index) => index.loc_to_iloc(key),
            AxisIndex::Hierarchy(index) => index.loc_to_iloc(key),
        }
    }

    /// New axis over the selected positions
    ///
    /// A hierarchy whose selected rows no longer group by prefix becomes a
    /// flat index of tuples.
    pub fn select(&self, key: &IlocKey) -> Result<AxisIndex> {
        match self {
            AxisIndex::Simple(index) => Ok(AxisIndex::Simple(index.select(key)?)),
            AxisIndex::Hierarchy(index) => match index.select(key) {
                Ok(selected) => Ok(AxisIndex::Hierarchy(selected)),
                Err(Error::MalformedHierarchy(_)) => {
                    Ok(AxisIndex::Simple(index.flat()?.select(key)?))
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Same labels in the same order
    pub fn equals(&self, other: &AxisIndex) -> bool {
        match (self, other) {
            (AxisIndex::Simple(a), AxisIndex::Simple(b)) => a.equals(b),
            (AxisIndex::Hierarchy(a), AxisIndex::Hierarchy(b)) => a.equals(b),
            _ => false,
        }
    }

    /// Labels of `self` followed by unseen labels of `other`
    pub fn union(&self, other: &AxisIndex) -> Result<AxisIndex> {
        match (self, other) {
            (AxisIndex::Simple(a), AxisIndex::Simple(b)) => Ok(AxisIndex::Simple(a.union(b))),
            (AxisIndex::Hierarchy(a), AxisIndex::Hierarchy(b)) if a.depth() == b.depth() => {
                Ok(AxisIndex::Hierarchy(a.union(b)?))
            }
            _ => Ok(AxisIndex::Simple(self.flatten()?.union(&other.flatten()?))),
        }
    }

    /// Labels of `self` also present in `other`
    pub fn intersection(&self, other: &AxisIndex) -> Result<AxisIndex> {
        match (self, other) {
            (AxisIndex::Simple(a), AxisIndex::Simple(b)) => {
                Ok(AxisIndex::Simple(a.intersection(b)))
            }
            (AxisIndex::Hierarchy(a), AxisIndex::Hierarchy(b)) if a.depth() == b.depth() => {
                Ok(AxisIndex::Hierarchy(a.intersection(b)?))
            }
            _ => Ok(AxisIndex::Simple(
                self.flatten()?.intersection(&other.flatten()?),
            )),
        }
    }

    /// Labels of every input in order
    ///
    /// Inputs that are all auto-generated give a fresh `0..n` range. A label
    /// seen twice is a construction error.
    pub fn concat(indices: &[&AxisIndex]) -> Result<AxisIndex> {
        if indices.iter().all(|index| index.is_trivial()) {
            return Ok(AxisIndex::range(indices.iter().map(|i| i.len()).sum()));
        }
        let duplicate = |e: Error| match e {
            Error::DuplicateLabel(label) => {
                Error::Construction(format!("duplicate label {} in concatenation", label))
            }
            other => other,
        };
        let depth = indices.first().map(|i| i.depth()).unwrap_or(1);
        let labels: Vec<Label> = indices.iter().flat_map(|i| i.labels()).collect();
        if depth > 1 && indices.iter().all(|i| i.depth() == depth) {
            let rows = labels.iter().map(|l| l.parts().to_vec()).collect();
            match IndexHierarchy::from_label_rows(rows, depth, None) {
                Ok(hierarchy) => return Ok(AxisIndex::Hierarchy(hierarchy)),
                Err(Error::MalformedHierarchy(_)) => {}
                Err(e) => return Err(duplicate(e)),
            }
        }
        Ok(AxisIndex::Simple(Index::new(labels).map_err(duplicate)?))
    }

    /// Flat index; hierarchies become tuple labels
    pub fn flatten(&self) -> Result<Index> {
        match self {
            AxisIndex::Simple(index) => Ok(index.clone()),
            AxisIndex::Hierarchy(index) => index.flat(),
        }
    }

    /// Nest every label under one new outermost label
    pub fn add_level(&self, level: impl Into<Label>) -> Result<AxisIndex> {
        let hierarchy = match self {
            AxisIndex::Simple(index) => index.add_level(level)?,
            AxisIndex::Hierarchy(index) => index.add_level(level)?,
        };
        Ok(AxisIndex::Hierarchy(hierarchy))
    }

    /// Map every label through `f`; the results must stay unique
    ///
    /// A hierarchy maps its tuple labels and is rebuilt from the results.
    pub fn relabel<F>(&self, f: F) -> Result<AxisIndex>
    where
        F: Fn(&Label) -> Label,
    {
        match self {
            AxisIndex::Simple(index) => Ok(AxisIndex::Simple(index.relabel(f)?)),
            AxisIndex::Hierarchy(index) => {
                let labels = index.labels().iter().map(f).collect();
                Ok(AxisIndex::infer(labels)?.rename(index.name().cloned()))
            }
        }
    }

    /// Remove outer (positive count) or inner (negative count) depths
    pub fn drop_level(&self, count: isize) -> Result<AxisIndex> {
        match self {
            AxisIndex::Simple(_) if count == 0 => Ok(self.clone()),
            AxisIndex::Simple(_) => Err(Error::InvalidOperation(
                "cannot drop a level from a flat index".into(),
            )),
            AxisIndex::Hierarchy(index) => index.drop_level(count),
        }
    }
}

impl From<Index> for AxisIndex {
    fn from(index: Index) -> Self {
        AxisIndex::Simple(index)
    }
}

impl From<IndexHierarchy> for AxisIndex {
    fn from(index: IndexHierarchy) -> Self {
        AxisIndex::Hierarchy(index)
    }
}

impl IndexTrait for AxisIndex {
    fn len(&self) -> usize {
        self.len()
    }

    fn depth(&self) -> usize {
        self.depth()
    }

    fn label_at(&self, pos: usize) -> Option<Label> {
        AxisIndex::label_at(self, pos)
    }

    fn loc_to_iloc(&self, key: &LocKey) -> Result<IlocKey> {
        AxisIndex::loc_to_iloc(self, key)
    }
}
