//! Label-based selection keys

use crate::block::IlocKey;
use crate::value::Label;

/// Label-based selection along one axis
#[derive(Debug, Clone, PartialEq)]
pub enum LocKey {
    /// Every label
    All,
    /// One label; on a hierarchy a tuple addresses all depths, anything else
    /// the outermost depth
    Label(Label),
    /// Labels from `start` through `stop`, both inclusive, in stored order
    Slice {
        start: Option<Label>,
        stop: Option<Label>,
    },
    /// Labels in the given order
    List(Vec<Label>),
    /// Boolean mask with one entry per position
    Mask(Vec<bool>),
    /// Per-depth selection against a hierarchy
    HLoc(HLoc),
    /// Positions passed through unchanged
    ILoc(IlocKey),
}

impl LocKey {
    pub fn label(label: impl Into<Label>) -> Self {
        LocKey::Label(label.into())
    }

    pub fn list<I, L>(labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        LocKey::List(labels.into_iter().map(Into::into).collect())
    }

    pub fn slice(start: impl Into<Label>, stop: impl Into<Label>) -> Self {
        LocKey::Slice {
            start: Some(start.into()),
            stop: Some(stop.into()),
        }
    }

    pub fn slice_from(start: impl Into<Label>) -> Self {
        LocKey::Slice {
            start: Some(start.into()),
            stop: None,
        }
    }

    pub fn slice_to(stop: impl Into<Label>) -> Self {
        LocKey::Slice {
            start: None,
            stop: Some(stop.into()),
        }
    }

    pub fn hloc(parts: Vec<LocKey>) -> Self {
        LocKey::HLoc(HLoc::new(parts))
    }

    pub fn iloc(key: impl Into<IlocKey>) -> Self {
        LocKey::ILoc(key.into())
    }

    /// True for keys that select more than one label by construction
    pub fn is_multiple(&self) -> bool {
        !matches!(self, LocKey::Label(_))
    }
}

impl From<Label> for LocKey {
    fn from(label: Label) -> Self {
        LocKey::Label(label)
    }
}

impl From<&str> for LocKey {
    fn from(label: &str) -> Self {
        LocKey::Label(label.into())
    }
}

impl From<i64> for LocKey {
    fn from(label: i64) -> Self {
        LocKey::Label(label.into())
    }
}

impl From<f64> for LocKey {
    fn from(label: f64) -> Self {
        LocKey::Label(label.into())
    }
}

impl From<IlocKey> for LocKey {
    fn from(key: IlocKey) -> Self {
        LocKey::ILoc(key)
    }
}

impl From<HLoc> for LocKey {
    fn from(key: HLoc) -> Self {
        LocKey::HLoc(key)
    }
}

/// Per-depth selection against a hierarchy, outermost depth first
///
/// Depths beyond the given parts are selected whole.
#[derive(Debug, Clone, PartialEq)]
pub struct HLoc(Vec<LocKey>);

impl HLoc {
    pub fn new(parts: Vec<LocKey>) -> Self {
        HLoc(parts)
    }

    /// Scalar selection of each given depth
    pub fn from_labels(labels: &[Label]) -> Self {
        HLoc(labels.iter().cloned().map(LocKey::Label).collect())
    }

    pub fn parts(&self) -> &[LocKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any depth selects by wildcard, slice, or list
    pub fn is_multiple(&self) -> bool {
        self.0.iter().any(LocKey::is_multiple)
    }
}
