//! Immutable columnar Frame and Series over typed blocks
//!
//! Columns live in reference-counted typed [`Block`]s collected by a
//! [`TypedBlockSet`]; axes are labelled by a flat [`Index`] or a hierarchical
//! [`IndexHierarchy`]. Every operation returns a new container.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::len_without_is_empty)]

pub mod block;
pub mod error;
pub mod frame;
pub mod index;
pub mod parallel;
pub mod series;
pub mod type_blocks;
pub mod value;

// Re-export commonly used types
pub use block::{Accumulation, BinaryOp, Block, DType, IlocKey, Reduction};
pub use error::{Error, ErrorKind, Result};
pub use frame::{AssignValue, Container, DropCondition, Frame, FrameData, GrowableFrame, Selection};
pub use index::{
    AxisIndex, GrowableIndex, GrowableIndexHierarchy, HLoc, Index, IndexHierarchy, IndexLevel,
    IndexTrait, LabelTree, LocKey,
};
pub use parallel::{map_ordered, ParallelConfig, PoolKind};
pub use series::Series;
pub use type_blocks::{AssignGrid, BlockStore, GrowableBlockSet, TypedBlockSet};
pub use value::{FloatLabel, Label, Value};

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
