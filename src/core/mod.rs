pub mod edge;
pub mod graph;
pub mod node;

pub use edge::{EdgeKind, EdgeToken, GraphEdge};
pub use graph::{EdgeSpec, GraphBuilder, LinearGraph, PermanentLinearGraph};
pub use node::{GraphNode, NodeIndex, NodeKind};
