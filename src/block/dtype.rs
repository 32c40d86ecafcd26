use std::fmt;

use serde::{Deserialize, Serialize};

/// Element type tag carried by every block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DType {
    Bool,
    Int32,
    Int64,
    Float64,
    /// Fixed-width text
    Str,
    /// Arbitrary values, including the generic missing value
    Object,
}

impl DType {
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Bool | DType::Int32 | DType::Int64 | DType::Float64)
    }

    pub fn is_integer(self) -> bool {
        matches!(self, DType::Int32 | DType::Int64)
    }

    /// Position in the numeric promotion lattice
    fn rank(self) -> Option<u8> {
        match self {
            DType::Bool => Some(0),
            DType::Int32 => Some(1),
            DType::Int64 => Some(2),
            DType::Float64 => Some(3),
            DType::Str | DType::Object => None,
        }
    }

    fn from_rank(rank: u8) -> DType {
        match rank {
            0 => DType::Bool,
            1 => DType::Int32,
            2 => DType::Int64,
            _ => DType::Float64,
        }
    }

    /// Narrowest type able to hold elements of both types in one array
    ///
    /// Booleans only combine with booleans; any other mix with bool, text or
    /// object data lands on `Object`.
    pub fn resolve(self, other: DType) -> DType {
        if self == other {
            return self;
        }
        match (self, other) {
            (DType::Bool, _) | (_, DType::Bool) => DType::Object,
            (a, b) => match (a.rank(), b.rank()) {
                (Some(x), Some(y)) => DType::from_rank(x.max(y)),
                _ => DType::Object,
            },
        }
    }

    /// Fold [`DType::resolve`] over many types; `None` for an empty input
    pub fn resolve_all<I: IntoIterator<Item = DType>>(dtypes: I) -> Option<DType> {
        dtypes.into_iter().reduce(DType::resolve)
    }

    /// Promotion for arithmetic following bool < int32 < int64 < float64
    pub fn promote_numeric(self, other: DType) -> Option<DType> {
        match (self.rank(), other.rank()) {
            (Some(x), Some(y)) => Some(DType::from_rank(x.max(y))),
            _ => None,
        }
    }

    /// Type of a column once a missing-value sentinel is introduced
    pub fn with_missing(self) -> DType {
        match self {
            DType::Int32 | DType::Int64 | DType::Float64 => DType::Float64,
            DType::Bool | DType::Str | DType::Object => DType::Object,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Bool => "bool",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Str => "str",
            DType::Object => "object",
        };
        write!(f, "{}", name)
    }
}
