//! Linear commit graph model and the Bek re-linearization that keeps runs of
//! related commits visually unbroken without ever placing a commit above one
//! of its display ancestors.

pub mod bek;
pub mod core;
pub mod error;
pub mod layout;
pub mod source;

pub use crate::core::{
    EdgeKind, EdgeSpec, EdgeToken, GraphBuilder, GraphEdge, GraphNode, LinearGraph, NodeIndex,
    NodeKind, PermanentLinearGraph,
};
pub use bek::{BekGraphController, BekPermutation};
pub use error::{GraphError, Result};
pub use layout::HeadOrder;
pub use source::{CommitData, CommitTimestamps, TimestampSource};
