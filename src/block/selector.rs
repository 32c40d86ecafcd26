use std::ops::Range;

use crate::error::{Error, Result};

/// Integer-position selection along one axis
#[derive(Debug, Clone, PartialEq)]
pub enum IlocKey {
    /// Every position
    All,
    /// A single position; collapses the axis
    Position(usize),
    /// A half-open run of positions
    Slice(Range<usize>),
    /// Explicit positions in the given order
    List(Vec<usize>),
    /// Boolean mask with one entry per position
    Mask(Vec<bool>),
}

/// An [`IlocKey`] validated against an axis length
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Single(usize),
    Many(Vec<usize>),
}

impl Resolved {
    pub fn positions(&self) -> Vec<usize> {
        match self {
            Resolved::Single(p) => vec![*p],
            Resolved::Many(ps) => ps.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Resolved::Single(_) => 1,
            Resolved::Many(ps) => ps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IlocKey {
    /// Check bounds and expand into positions
    pub fn resolve(&self, len: usize) -> Result<Resolved> {
        let check = |p: usize| {
            if p < len {
                Ok(p)
            } else {
                Err(Error::IndexOutOfBounds { index: p, size: len })
            }
        };
        match self {
            IlocKey::All => Ok(Resolved::Many((0..len).collect())),
            IlocKey::Position(p) => Ok(Resolved::Single(check(*p)?)),
            IlocKey::Slice(range) => {
                let end = range.end.min(len);
                let start = range.start.min(end);
                Ok(Resolved::Many((start..end).collect()))
            }
            IlocKey::List(ps) => Ok(Resolved::Many(
                ps.iter().map(|p| check(*p)).collect::<Result<_>>()?,
            )),
            IlocKey::Mask(mask) => {
                if mask.len() != len {
                    return Err(Error::LengthMismatch {
                        expected: len,
                        actual: mask.len(),
                    });
                }
                Ok(Resolved::Many(
                    mask.iter()
                        .enumerate()
                        .filter_map(|(i, keep)| keep.then_some(i))
                        .collect(),
                ))
            }
        }
    }

    /// True when this key selects every position unchanged
    pub fn is_identity(&self, len: usize) -> bool {
        match self {
            IlocKey::All => true,
            IlocKey::Slice(r) => r.start == 0 && r.end >= len,
            _ => false,
        }
    }
}

impl From<usize> for IlocKey {
    fn from(p: usize) -> Self {
        IlocKey::Position(p)
    }
}

impl From<Range<usize>> for IlocKey {
    fn from(r: Range<usize>) -> Self {
        IlocKey::Slice(r)
    }
}

impl From<Vec<usize>> for IlocKey {
    fn from(ps: Vec<usize>) -> Self {
        IlocKey::List(ps)
    }
}

impl From<Vec<bool>> for IlocKey {
    fn from(mask: Vec<bool>) -> Self {
        IlocKey::Mask(mask)
    }
}
